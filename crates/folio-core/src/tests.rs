#[cfg(test)]
mod tests {
    use crate::behavior::{InteractPhase, InteractState, button_behavior};
    use crate::card::{CardBegin, card_begin, card_end, draw_card};
    use crate::{
        CardStyle, ClickTrigger, Color, CommandBuffer, Context, DrawCommand, Input, PanelFlags,
        PointerButton, Rect, Style, Vec2,
    };

    fn test_style() -> Style {
        let mut style = Style::dark();
        // Zero spacing so vertical reservations are exact in assertions.
        style.window.spacing = Vec2::ZERO;
        style
    }

    fn plain_card_style() -> CardStyle {
        CardStyle {
            rounding: 0.0,
            margin: Vec2::ZERO,
            padding: Vec2::new(5.0, 5.0),
            touch_padding: Vec2::ZERO,
            ..CardStyle::default()
        }
    }

    /// One frame of input: optional motion, optional primary transition.
    fn step_input(input: &mut Input, pos: Option<Vec2>, primary: Option<bool>) {
        input.begin();
        if let Some(p) = pos {
            input.motion(p);
        }
        if let Some(down) = primary {
            let at = input.pointer();
            input.button(PointerButton::Primary, at, down);
        }
        input.end();
    }

    #[test]
    fn test_color_factor() {
        let c = Color::from_rgba(100, 100, 100, 200);
        assert_eq!(c.factor(1.5), Color(150, 150, 150, 200));
        assert_eq!(c.factor(1.0), c);
        // Saturates at white, alpha untouched.
        assert_eq!(Color::from_rgb(200, 10, 0).factor(2.0), Color(255, 20, 0, 255));
        assert_eq!(c.factor(0.5), Color(50, 50, 50, 200));
    }

    #[test]
    fn test_rect_ops() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(50.0, 25.0, 100.0, 50.0);
        assert!(a.intersects(&b));
        assert_eq!(a.intersect(&b), Rect::new(50.0, 25.0, 50.0, 25.0));
        assert_eq!(a.union_bounds(&b), Rect::new(0.0, 0.0, 150.0, 75.0));

        let apart = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert!(!a.intersects(&apart));
        assert!(a.intersect(&apart).is_empty());

        assert_eq!(
            a.shrink(Vec2::new(10.0, 5.0)),
            Rect::new(10.0, 5.0, 80.0, 40.0)
        );
        assert_eq!(
            a.pad(Vec2::new(10.0, 5.0)),
            Rect::new(-10.0, -5.0, 120.0, 60.0)
        );
    }

    #[test]
    fn test_behavior_no_input_is_noop() {
        let mut state = InteractState {
            phase: InteractPhase::Active,
            entered: true,
            left: false,
        };
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let activated = button_behavior(&mut state, rect, None, ClickTrigger::OnRelease);
        assert!(!activated);
        assert_eq!(state, InteractState::default());
    }

    #[test]
    fn test_behavior_hover_and_edges() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        let mut input = Input::default();
        let mut state = InteractState::default();

        // Frame 1: pointer outside.
        step_input(&mut input, Some(Vec2::new(500.0, 500.0)), None);
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));
        assert_eq!(state.phase, InteractPhase::Normal);
        assert!(!state.entered && !state.left);

        // Frame 2: pointer moves in -> hovered + entered.
        step_input(&mut input, Some(Vec2::new(50.0, 50.0)), None);
        button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease);
        assert_eq!(state.phase, InteractPhase::Hovered);
        assert!(state.entered);
        assert!(!state.left);

        // Frame 3: pointer moves out -> left edge.
        step_input(&mut input, Some(Vec2::new(500.0, 500.0)), None);
        button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease);
        assert_eq!(state.phase, InteractPhase::Normal);
        assert!(!state.entered);
        assert!(state.left);
    }

    #[test]
    fn test_behavior_release_trigger_fires_once() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        let inside = Vec2::new(50.0, 50.0);
        let mut input = Input::default();
        let mut state = InteractState::default();

        // Move in.
        step_input(&mut input, Some(inside), None);
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));

        // Press: active, but no activation yet under release trigger.
        step_input(&mut input, None, Some(true));
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));
        assert_eq!(state.phase, InteractPhase::Active);

        // Held: still nothing.
        step_input(&mut input, None, None);
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));
        assert_eq!(state.phase, InteractPhase::Active);

        // Release inside: exactly one activation.
        step_input(&mut input, None, Some(false));
        assert!(button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));

        // Quiet frame: nothing again.
        step_input(&mut input, None, None);
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));
    }

    #[test]
    fn test_behavior_press_trigger() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        let mut input = Input::default();
        let mut state = InteractState::default();

        step_input(&mut input, Some(Vec2::new(50.0, 50.0)), None);
        button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnPress);

        step_input(&mut input, None, Some(true));
        assert!(button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnPress));

        step_input(&mut input, None, Some(false));
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnPress));
    }

    #[test]
    fn test_behavior_press_outside_never_activates() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        let mut input = Input::default();
        let mut state = InteractState::default();

        // Press outside, drag in, release inside: the press did not start
        // in the rectangle, so no activation.
        step_input(&mut input, Some(Vec2::new(500.0, 500.0)), Some(true));
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));

        step_input(&mut input, Some(Vec2::new(50.0, 50.0)), None);
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));

        step_input(&mut input, None, Some(false));
        assert!(!button_behavior(&mut state, rect, Some(&input), ClickTrigger::OnRelease));
    }

    #[test]
    fn test_draw_state_precedence_and_factors() {
        let style = CardStyle {
            normal: Color::from_rgb(100, 100, 100),
            hover: Color::from_rgb(120, 120, 120),
            active: Color::from_rgb(80, 80, 80),
            color_factor_background: 0.5,
            ..CardStyle::default()
        };
        let bounds = Rect::new(0.0, 0.0, 100.0, 60.0);

        let mut buf = CommandBuffer::new();
        let active = InteractState {
            phase: InteractPhase::Active,
            entered: false,
            left: false,
        };
        let used = draw_card(&mut buf, bounds, active, &style);
        // Active wins over hover, scaled by the background factor.
        assert_eq!(used, Color::from_rgb(40, 40, 40));
        match &buf.commands()[0] {
            DrawCommand::RectFilled { color, .. } => assert_eq!(*color, used),
            other => panic!("expected fill, got {other:?}"),
        }
        match &buf.commands()[1] {
            DrawCommand::RectStroked { color, thickness, .. } => {
                assert_eq!(*color, style.border_color.factor(0.5));
                assert_eq!(*thickness, style.border);
            }
            other => panic!("expected stroke, got {other:?}"),
        }

        let mut buf = CommandBuffer::new();
        let normal = InteractState::default();
        assert_eq!(
            draw_card(&mut buf, bounds, normal, &style),
            Color::from_rgb(50, 50, 50)
        );
    }

    #[test]
    fn test_layout_reservation_visible_and_clipped() {
        for window_h in [400.0_f32, 100.0_f32] {
            let mut ctx = Context::new(test_style());
            ctx.frame_begin();
            assert!(ctx.window_begin(
                "reserve",
                Rect::new(0.0, 0.0, 200.0, window_h),
                PanelFlags::empty(),
            ));

            // Push the card row down; with the short window this puts it
            // fully below the clip.
            ctx.layout_row_dynamic(200.0, 1);
            let _ = ctx.alloc_space().unwrap();

            let style = CardStyle {
                margin: Vec2::new(20.0, 10.0),
                ..plain_card_style()
            };
            let before = ctx.panel_at(0).unwrap().at_y;
            let result = card_begin(&mut ctx, "r", 60.0, &style);
            if result.is_open() {
                card_end(&mut ctx);
            }
            let row_top = ctx.panel_at(0).unwrap().at_y;
            // Declaring the card row advanced past the previous row only.
            assert_eq!(row_top, before + 200.0);

            // The next row starts exactly height + 2*margin.y further down,
            // clipped or not.
            ctx.layout_row_dynamic(5.0, 1);
            let after = ctx.panel_at(0).unwrap().at_y;
            assert_eq!(after - row_top, 60.0 + 2.0 * 10.0);

            ctx.window_end();
            let _ = ctx.frame_end();
        }
    }

    #[test]
    fn test_clip_skip_touches_nothing() {
        let mut ctx = Context::new(test_style());
        ctx.frame_begin();
        assert!(ctx.window_begin(
            "skip",
            Rect::new(0.0, 0.0, 200.0, 100.0),
            PanelFlags::empty(),
        ));

        ctx.layout_row_dynamic(200.0, 1);
        let _ = ctx.alloc_space().unwrap();

        let result = card_begin(&mut ctx, "offscreen", 60.0, &plain_card_style());
        assert_eq!(result, CardBegin::Skipped);
        // No nested panel was opened and no persistent slots were created.
        assert_eq!(ctx.panel_depth(), 1);
        assert_eq!(ctx.window_by_title("skip").unwrap().storage_len(), 0);

        ctx.window_end();
        let _ = ctx.frame_end();
    }

    #[test]
    fn test_identity_sharing_by_key() {
        let mut ctx = Context::new(test_style());
        ctx.frame_begin();
        assert!(ctx.window_begin(
            "ids",
            Rect::new(0.0, 0.0, 300.0, 600.0),
            PanelFlags::empty(),
        ));

        // First card writes offsets through its panel.
        let r = card_begin(&mut ctx, "shared", 60.0, &plain_card_style());
        assert!(r.is_open());
        ctx.active_panel_mut().unwrap().offset = Vec2::new(7.0, 11.0);
        card_end(&mut ctx);
        assert_eq!(ctx.window_by_title("ids").unwrap().storage_len(), 2);

        // Second card with the same key sees them.
        let r = card_begin(&mut ctx, "shared", 60.0, &plain_card_style());
        assert!(r.is_open());
        assert_eq!(ctx.active_panel().unwrap().offset, Vec2::new(7.0, 11.0));
        card_end(&mut ctx);

        // A different key gets its own fresh slots.
        let r = card_begin(&mut ctx, "other", 60.0, &plain_card_style());
        assert!(r.is_open());
        assert_eq!(ctx.active_panel().unwrap().offset, Vec2::ZERO);
        card_end(&mut ctx);
        assert_eq!(ctx.window_by_title("ids").unwrap().storage_len(), 4);

        ctx.window_end();
        let _ = ctx.frame_end();
    }

    #[test]
    fn test_clip_round_trip_nested() {
        let mut ctx = Context::new(test_style());
        ctx.frame_begin();
        assert!(ctx.window_begin(
            "clip",
            Rect::new(0.0, 0.0, 400.0, 600.0),
            PanelFlags::empty(),
        ));

        let clip0 = ctx.current_window().unwrap().buffer.clip;

        let outer = card_begin(&mut ctx, "outer", 300.0, &plain_card_style());
        assert!(outer.is_open());
        let clip1 = ctx.current_window().unwrap().buffer.clip;
        assert!(clip1.w <= clip0.w && clip1.h <= clip0.h);

        let inner = card_begin(&mut ctx, "inner", 60.0, &plain_card_style());
        assert!(inner.is_open());

        card_end(&mut ctx);
        assert_eq!(ctx.current_window().unwrap().buffer.clip, clip1);

        card_end(&mut ctx);
        assert_eq!(ctx.current_window().unwrap().buffer.clip, clip0);

        ctx.window_end();
        let _ = ctx.frame_end();
    }

    #[test]
    fn test_card_end_reports_dynamic_bounds() {
        let mut ctx = Context::new(test_style());
        ctx.frame_begin();
        assert!(ctx.window_begin(
            "dyn",
            Rect::new(0.0, 0.0, 300.0, 600.0),
            PanelFlags::empty(),
        ));

        let r = card_begin(&mut ctx, "grow", 60.0, &plain_card_style());
        assert!(r.is_open());
        let content = ctx.active_panel().unwrap().bounds;
        ctx.layout_row_dynamic(40.0, 1);
        let _ = ctx.alloc_space().unwrap();
        let final_bounds = card_end(&mut ctx);

        // Dynamic panels report the height their content reached.
        let gp = ctx.style.window.group_padding;
        assert_eq!(final_bounds.x, content.x);
        assert_eq!(final_bounds.h, 40.0 + 2.0 * gp.y);

        ctx.window_end();
        let _ = ctx.frame_end();
    }

    #[test]
    fn test_card_activation_cycle() {
        let style = plain_card_style();
        let mut ctx = Context::new(test_style());
        // Window content starts at (8, 8); the first card row is 60 tall
        // and spans the inner width, so (50, 30) is inside the card and
        // (150, 280) is inside the window but below it.
        let inside = Vec2::new(50.0, 30.0);
        let outside = Vec2::new(150.0, 280.0);

        let mut run = |pos: Option<Vec2>, primary: Option<bool>, ctx: &mut Context| -> bool {
            step_input(&mut ctx.input, pos, primary);
            ctx.frame_begin();
            assert!(ctx.window_begin(
                "press",
                Rect::new(0.0, 0.0, 300.0, 300.0),
                PanelFlags::empty(),
            ));
            let result = card_begin(ctx, "hit", 60.0, &style);
            let pressed = match result {
                CardBegin::Open { pressed } => {
                    card_end(ctx);
                    pressed
                }
                _ => false,
            };
            ctx.window_end();
            let _ = ctx.frame_end();
            pressed
        };

        // Pointer never inside: no activation through press and release.
        assert!(!run(Some(outside), None, &mut ctx));
        assert!(!run(None, Some(true), &mut ctx));
        assert!(!run(None, Some(false), &mut ctx));

        // Move inside, press, hold, release: one activation, on the release.
        assert!(!run(Some(inside), None, &mut ctx));
        assert!(!run(None, Some(true), &mut ctx));
        assert!(!run(None, None, &mut ctx));
        assert!(run(None, Some(false), &mut ctx));
        assert!(!run(None, None, &mut ctx));
    }

    #[test]
    fn test_read_only_window_suppresses_card_input() {
        let style = plain_card_style();
        let mut ctx = Context::new(test_style());
        let inside = Vec2::new(50.0, 30.0);

        // Press and release inside the card, but the window is read-only.
        for primary in [Some(true), Some(false)] {
            step_input(&mut ctx.input, Some(inside), primary);
            ctx.frame_begin();
            ctx.window_begin(
                "rom",
                Rect::new(0.0, 0.0, 300.0, 300.0),
                PanelFlags::ROM,
            );
            let result = card_begin(&mut ctx, "quiet", 60.0, &style);
            assert_eq!(result, CardBegin::Open { pressed: false });
            // The nested panel inherits the read-only flag.
            assert!(ctx.active_panel().unwrap().is_read_only());
            card_end(&mut ctx);
            ctx.window_end();
            let _ = ctx.frame_end();
        }
    }

    #[test]
    fn test_card_sets_ambient_background_and_text() {
        let style = CardStyle {
            color_factor_text: 0.5,
            text_normal: Color::from_rgb(200, 100, 50),
            ..plain_card_style()
        };
        let mut ctx = Context::new(test_style());
        let saved = ctx.style;
        ctx.frame_begin();
        ctx.window_begin(
            "ambient",
            Rect::new(0.0, 0.0, 300.0, 300.0),
            PanelFlags::empty(),
        );
        let r = card_begin(&mut ctx, "bg", 60.0, &style);
        assert!(r.is_open());
        assert_eq!(ctx.style.window.background, style.normal);
        assert_eq!(ctx.style.text.color, Color::from_rgb(100, 50, 25));
        assert_eq!(ctx.active_panel().unwrap().background, style.normal);
        card_end(&mut ctx);
        ctx.style = saved;
        ctx.window_end();
        let _ = ctx.frame_end();
    }

    #[test]
    fn test_padding_precondition_ok() {
        // rounding=10 with padding=(5,5): 5*2 >= 10 passes.
        let style = CardStyle {
            rounding: 10.0,
            padding: Vec2::new(5.0, 5.0),
            margin: Vec2::ZERO,
            touch_padding: Vec2::ZERO,
            ..CardStyle::default()
        };
        let mut ctx = Context::new(test_style());
        ctx.frame_begin();
        ctx.window_begin(
            "pad",
            Rect::new(0.0, 0.0, 300.0, 300.0),
            PanelFlags::empty(),
        );
        let r = card_begin(&mut ctx, "ok", 60.0, &style);
        assert!(r.is_open());
        card_end(&mut ctx);
        ctx.window_end();
        let _ = ctx.frame_end();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "padding")]
    fn test_padding_precondition_violated() {
        let style = CardStyle {
            rounding: 10.0,
            padding: Vec2::new(2.0, 2.0),
            ..CardStyle::default()
        };
        let mut ctx = Context::new(test_style());
        ctx.frame_begin();
        ctx.window_begin(
            "bad",
            Rect::new(0.0, 0.0, 300.0, 300.0),
            PanelFlags::empty(),
        );
        let _ = card_begin(&mut ctx, "bad", 60.0, &style);
    }

    #[test]
    fn test_window_retains_bounds() {
        let mut ctx = Context::new(test_style());

        ctx.frame_begin();
        ctx.window_begin(
            "retained",
            Rect::new(10.0, 20.0, 300.0, 300.0),
            PanelFlags::empty(),
        );
        ctx.window_end();
        let _ = ctx.frame_end();

        // The bounds passed on later frames are ignored; the stored ones
        // win, which is what lets MOVABLE windows keep their position.
        ctx.frame_begin();
        ctx.window_begin(
            "retained",
            Rect::new(999.0, 999.0, 1.0, 1.0),
            PanelFlags::empty(),
        );
        let bounds = ctx.window_by_title("retained").unwrap().bounds;
        assert_eq!(bounds, Rect::new(10.0, 20.0, 300.0, 300.0));
        ctx.window_end();
        let _ = ctx.frame_end();
    }

    #[test]
    fn test_frame_concatenates_windows_in_order() {
        let mut ctx = Context::new(test_style());
        ctx.frame_begin();
        ctx.window_begin(
            "first",
            Rect::new(0.0, 0.0, 100.0, 100.0),
            PanelFlags::empty(),
        );
        ctx.window_end();
        ctx.window_begin(
            "second",
            Rect::new(100.0, 0.0, 100.0, 100.0),
            PanelFlags::empty(),
        );
        ctx.window_end();
        let frame = ctx.frame_end();

        // Each window contributes at least its background fill, and the
        // first window's commands come first.
        let first_fill = frame.commands.iter().position(|c| {
            matches!(c, DrawCommand::RectFilled { rect, .. } if rect.x == 0.0)
        });
        let second_fill = frame.commands.iter().position(|c| {
            matches!(c, DrawCommand::RectFilled { rect, .. } if rect.x == 100.0)
        });
        assert!(first_fill.unwrap() < second_fill.unwrap());
        assert_eq!(frame.clear, ctx.style.clear_color);
    }
}
