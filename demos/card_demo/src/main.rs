//! Card demo: one movable, titled window with three expandable cards.
//! Clicking a card focusses it (thick accent border); the button in each
//! heading expands an extra description row.

use folio_core::*;

const NUM_CARDS: usize = 3;
const BASE_HEIGHT: f32 = 60.0;
const EXPANDED_EXTRA: f32 = 30.0;

struct CardContent {
    heading: &'static str,
    description: &'static str,
}

const CONTENTS: [CardContent; NUM_CARDS] = [
    CardContent {
        heading: "Take off",
        description: "Whoosh!",
    },
    CardContent {
        heading: "Fluffy looking",
        description: "Actually rather soggy.",
    },
    CardContent {
        heading: "Bang bang",
        description: "My thumb will never be the same.",
    },
];

fn base_card_style(accent: Color) -> CardStyle {
    CardStyle {
        rounding: 10.0,
        margin: Vec2::new(20.0, 10.0),
        padding: Vec2::new(5.0, 5.0),
        touch_padding: Vec2::new(5.0, 5.0),
        border: 1.0,
        border_color: Color::from_rgb(200, 200, 200),
        normal: Color::from_rgb(100, 100, 100),
        hover: Color::from_rgb(120, 120, 120),
        active: Color::from_rgb(80, 80, 80),
        text_normal: Color::from_rgb(235, 235, 235),
        text_hover: accent,
        text_active: accent.factor(2.0),
        color_factor_background: 1.0,
        color_factor_text: 1.0,
    }
}

fn heading(ctx: &mut Context, title: &str, expanded: &mut bool) {
    ctx.layout_row(28.0, &[0.78, 0.22]);
    label(ctx, title, TextAlign::Left);
    let toggle = if *expanded { "Less" } else { "More" };
    if button(ctx, toggle) {
        *expanded = !*expanded;
    }
}

fn description(ctx: &mut Context, height: f32, text: &str) {
    ctx.layout_row_dynamic(height, 1);
    label(ctx, text, TextAlign::Left);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut expanded = [false; NUM_CARDS];
    let mut focussed: Option<usize> = None;

    folio_platform::run_desktop("Folio Card Demo", Style::dark(), move |ctx| {
        let accent = Color::from_rgb(120, 120, 210);

        if ctx.window_begin(
            "Card Demo",
            Rect::new(320.0, 50.0, 475.0, 610.0),
            PanelFlags::BORDER | PanelFlags::MOVABLE | PanelFlags::TITLE,
        ) {
            for (i, content) in CONTENTS.iter().enumerate() {
                let saved = ctx.style;

                let mut card_style = base_card_style(accent);
                if focussed == Some(i) {
                    card_style.border_color = accent;
                    card_style.border = 3.0;
                }

                let extra = if expanded[i] { EXPANDED_EXTRA } else { 0.0 };
                match card_begin(ctx, content.heading, BASE_HEIGHT + extra, &card_style) {
                    CardBegin::Open { pressed } => {
                        if pressed {
                            log::info!("card {i} pressed");
                            focussed = Some(i);
                        }
                        heading(ctx, content.heading, &mut expanded[i]);
                        if expanded[i] {
                            description(ctx, extra, content.description);
                        }
                        card_end(ctx);
                    }
                    CardBegin::Skipped | CardBegin::Closed | CardBegin::Minimized => {}
                }

                ctx.style = saved;
            }
        }
        ctx.window_end();
    })
}
