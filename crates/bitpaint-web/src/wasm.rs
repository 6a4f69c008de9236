#![forbid(unsafe_code)]

use bitpaint_core::config::SessionConfig;
use bitpaint_core::event::{Event, PointerButton, PointerButtons, PointerEvent};
use bitpaint_core::geometry::SurfaceSize;
use bitpaint_core::picture::{COLS, Picture, ROWS};
use bitpaint_core::session::{Presenter, Session};
use bitpaint_render::GridRenderer;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, Window};

use crate::WebBackendError;
use crate::input::HostEvent;

impl From<JsValue> for WebBackendError {
    fn from(value: JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

fn to_js(err: WebBackendError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Presenter drawing straight to a `<canvas>` and an `<input>`.
struct CanvasPresenter {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    input: HtmlInputElement,
    renderer: GridRenderer,
}

impl CanvasPresenter {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    // Offset by half a pixel so one-pixel lines land on pixel centers.
    fn draw_line(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<(), JsValue> {
        self.ctx.translate(0.5, 0.5)?;
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        self.ctx.line_to(x1, y1);
        self.ctx.stroke();
        self.ctx.translate(-0.5, -0.5)
    }
}

impl Presenter for CanvasPresenter {
    type Error = WebBackendError;

    fn show_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.input.set_value(text);
        Ok(())
    }

    fn publish_link(&mut self, link: &str) -> Result<(), Self::Error> {
        self.window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(link))?;
        Ok(())
    }

    fn repaint(&mut self, picture: Picture, show_grid: bool) -> Result<(), Self::Error> {
        let size = self.size();
        let (width, height) = (f64::from(size.width()), f64::from(size.height()));

        self.ctx.set_fill_style_str(&self.renderer.off.to_css());
        self.ctx.fill_rect(0.0, 0.0, width, height);
        self.ctx.set_fill_style_str(&self.renderer.on.to_css());
        for pos in picture.set_cells() {
            let r = size.cell_rect(pos);
            self.ctx.fill_rect(
                f64::from(r.x),
                f64::from(r.y),
                f64::from(r.width),
                f64::from(r.height),
            );
        }

        if show_grid {
            self.ctx.set_stroke_style_str(&self.renderer.grid.to_css());
            for col in 1..u32::from(COLS) {
                let x = f64::from(size.column_edge(col));
                self.draw_line(x, 0.0, x, height)?;
            }
            for row in 1..u32::from(ROWS) {
                let y = f64::from(size.row_edge(row));
                self.draw_line(0.0, y, width, y)?;
            }
        }
        Ok(())
    }
}

/// Browser bitpaint session bound to a canvas and a text input.
///
/// The page forwards DOM events to the matching methods; all view updates
/// (input value, address bar, canvas) happen inside.
#[wasm_bindgen]
pub struct BitPaintWeb {
    session: Session<CanvasPresenter>,
}

#[wasm_bindgen]
impl BitPaintWeb {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, input: HtmlInputElement) -> Result<BitPaintWeb, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let presenter = CanvasPresenter {
            window,
            canvas,
            ctx,
            input,
            renderer: GridRenderer::default(),
        };
        let size = presenter.size();
        let link_base = presenter.window.location().pathname().unwrap_or_default();
        let config = SessionConfig::default().with_link_base(link_base);
        Ok(Self {
            session: Session::new(presenter, size, config),
        })
    }

    /// Read `?picture=` from the page address and draw the first frame.
    pub fn start(&mut self) -> Result<(), JsValue> {
        let search = self
            .session
            .presenter()
            .window
            .location()
            .search()
            .unwrap_or_default();
        self.session.startup(&search).map_err(to_js)?;
        Ok(())
    }

    /// Accepts one [`HostEvent`] encoded as JSON.
    pub fn input(&mut self, json: &str) -> Result<(), JsValue> {
        let event = HostEvent::from_json_str(json)
            .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;
        self.dispatch(event.into())
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: i32, y: i32, button: u8) -> Result<(), JsValue> {
        self.dispatch(Event::Pointer(PointerEvent::Down {
            x,
            y,
            button: PointerButton::from_u8(button),
        }))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: i32, y: i32, buttons: u8) -> Result<(), JsValue> {
        self.dispatch(Event::Pointer(PointerEvent::Move {
            x,
            y,
            buttons: PointerButtons::from_bits_truncate(buttons),
        }))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<(), JsValue> {
        self.dispatch(Event::Pointer(PointerEvent::Up))
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<(), JsValue> {
        self.dispatch(Event::Pointer(PointerEvent::Leave))
    }

    /// The text input fired `input`; its current value is read back.
    #[wasm_bindgen(js_name = textEdited)]
    pub fn text_edited(&mut self) -> Result<(), JsValue> {
        let text = self.session.presenter().input.value();
        self.dispatch(Event::TextEdited(text))
    }

    #[wasm_bindgen(js_name = toggleGrid)]
    pub fn toggle_grid(&mut self) -> Result<(), JsValue> {
        self.dispatch(Event::ToggleGrid)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.dispatch(Event::Clear)
    }

    /// The canvas element was resized; re-reads its dimensions.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        let size = self.session.presenter().size();
        self.session.resize(size).map_err(to_js)
    }

    /// Current picture in decimal.
    pub fn picture(&self) -> String {
        self.session.text()
    }

    /// Current shareable link.
    pub fn link(&self) -> String {
        self.session.link()
    }
}

impl BitPaintWeb {
    fn dispatch(&mut self, event: Event) -> Result<(), JsValue> {
        self.session.handle(event).map_err(to_js)
    }
}
