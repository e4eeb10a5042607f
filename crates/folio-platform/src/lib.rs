//! Desktop runner: winit event loop, input translation, frame pump.
//!
//! The app is a closure invoked once per frame between `frame_begin` and
//! `frame_end`; the resulting command list goes straight to the wgpu
//! backend. Immediate mode wants a frame per tick, so a redraw is requested
//! from `about_to_wait`.

use std::sync::Arc;

use folio_core::{Context, PointerButton, Style, Vec2};
use folio_render_wgpu::WgpuBackend;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowAttributes};

/// Pixels one scroll-wheel line is worth.
const LINE_SCROLL_PX: f32 = 40.0;

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Tertiary),
        _ => None,
    }
}

struct App {
    title: String,
    app: Box<dyn FnMut(&mut Context)>,
    window: Option<Arc<Window>>,
    backend: Option<WgpuBackend>,
    ctx: Context,
}

impl App {
    fn new(title: &str, style: Style, app: Box<dyn FnMut(&mut Context)>) -> Self {
        let mut ctx = Context::new(style);
        // Open the input bracket so pre-first-frame events have somewhere
        // to land; RedrawRequested closes and reopens it per frame.
        ctx.input.begin();
        Self {
            title: title.to_owned(),
            app,
            window: None,
            backend: None,
            ctx,
        }
    }

    fn request_redraw(&self) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler<()> for App {
    fn resumed(&mut self, el: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match el.create_window(
            WindowAttributes::default()
                .with_title(&self.title)
                .with_inner_size(PhysicalSize::new(1280, 800)),
        ) {
            Ok(win) => {
                let win = Arc::new(win);
                match WgpuBackend::new(win.clone()) {
                    Ok(backend) => {
                        self.backend = Some(backend);
                        self.window = Some(win);
                        self.request_redraw();
                    }
                    Err(e) => {
                        log::error!("failed to create wgpu backend: {e}");
                        el.exit();
                    }
                }
            }
            Err(e) => {
                log::error!("failed to create window: {e:?}");
                el.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        el: &winit::event_loop::ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                el.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(b) = &mut self.backend {
                    b.configure_surface(size.width, size.height);
                }
                self.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.ctx
                    .input
                    .motion(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = map_button(button) {
                    let at = self.ctx.input.pointer();
                    self.ctx
                        .input
                        .button(button, at, state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(x, y) => {
                        Vec2::new(x * LINE_SCROLL_PX, y * LINE_SCROLL_PX)
                    }
                    MouseScrollDelta::PixelDelta(p) => Vec2::new(p.x as f32, p.y as f32),
                };
                self.ctx.input.scroll(d);
            }
            WindowEvent::RedrawRequested => {
                let Some(backend) = self.backend.as_mut() else {
                    return;
                };
                self.ctx.input.end();
                self.ctx.frame_begin();
                (self.app)(&mut self.ctx);
                let frame = self.ctx.frame_end();
                backend.frame(&frame);
                // Reopen the bracket for the events leading to the next
                // frame.
                self.ctx.input.begin();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _el: &winit::event_loop::ActiveEventLoop) {
        self.request_redraw();
    }
}

/// Run a folio app on the desktop: opens one OS window, pumps input into
/// the context, and renders every frame until the window closes.
pub fn run_desktop(
    title: &str,
    style: Style,
    app: impl FnMut(&mut Context) + 'static,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut handler = App::new(title, style, Box::new(app));
    event_loop.run_app(&mut handler)?;
    Ok(())
}
