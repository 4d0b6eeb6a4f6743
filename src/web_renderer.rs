use crate::entity::Point;
use crate::game::Game;
use crate::input::Input;
use crate::renderer::{self, Color, Renderer, Surface};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

/// Side of one grid cell in CSS pixels.
pub const SQUARE_SIZE: f64 = 15.0;

type InputQueue = Rc<RefCell<VecDeque<Input>>>;

fn js_error(err: JsValue) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:?}", err))
}

pub struct WebRenderer {
    document: web_sys::Document,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    score: HtmlElement,

    // Filled by event listeners, drained by the game loop
    pending_input: InputQueue,

    // Touch state
    touch_start_pos: Rc<RefCell<Option<(f64, f64)>>>,
}

impl WebRenderer {
    /// Creates the board canvas inside `container_id` and binds the score
    /// element. Fails if either element or the 2D context is missing.
    pub fn new(container_id: &str, score_id: &str, map_size: i32) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let container = document
            .get_element_by_id(container_id)
            .ok_or("container element not found")?;
        let score = document
            .get_element_by_id(score_id)
            .ok_or("score element not found")?
            .dyn_into::<HtmlElement>()?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        let side = (SQUARE_SIZE * map_size as f64) as u32;
        canvas.set_width(side);
        canvas.set_height(side);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        container.append_child(&canvas)?;

        Ok(Self {
            document,
            canvas,
            context,
            score,
            pending_input: Rc::new(RefCell::new(VecDeque::new())),
            touch_start_pos: Rc::new(RefCell::new(None)),
        })
    }

    fn setup_keyboard_listener(&self) -> Result<(), JsValue> {
        let pending_input = self.pending_input.clone();

        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if event.default_prevented() {
                return;
            }
            if let Some(input) = Input::from_key(&event.key()) {
                pending_input.borrow_mut().push_back(input);
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;

        closure.forget(); // Keep listener alive
        Ok(())
    }

    fn setup_touch_listeners(&self) -> Result<(), JsValue> {
        // TouchStart: Record initial position
        let touch_start_pos = self.touch_start_pos.clone();
        let touchstart_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default(); // Prevent zooming, scrolling, etc.

            if let Some(touch) = event.touches().item(0) {
                let x = touch.client_x() as f64;
                let y = touch.client_y() as f64;
                *touch_start_pos.borrow_mut() = Some((x, y));
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas
            .add_event_listener_with_callback("touchstart", touchstart_closure.as_ref().unchecked_ref())?;
        touchstart_closure.forget();

        // TouchEnd: a swipe steers, a tap restarts
        let touch_start_pos = self.touch_start_pos.clone();
        let pending_input = self.pending_input.clone();
        let touchend_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();

            let start = touch_start_pos.borrow_mut().take();
            if let (Some((start_x, start_y)), Some(touch)) = (start, event.changed_touches().item(0)) {
                let dx = touch.client_x() as f64 - start_x;
                let dy = touch.client_y() as f64 - start_y;

                pending_input.borrow_mut().push_back(Input::from_touch(dx, dy));
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas
            .add_event_listener_with_callback("touchend", touchend_closure.as_ref().unchecked_ref())?;
        touchend_closure.forget();

        // TouchCancel: Clear state if touch is cancelled
        let touch_start_pos = self.touch_start_pos.clone();
        let touchcancel_closure = Closure::wrap(Box::new(move |_event: TouchEvent| {
            *touch_start_pos.borrow_mut() = None;
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas
            .add_event_listener_with_callback("touchcancel", touchcancel_closure.as_ref().unchecked_ref())?;
        touchcancel_closure.forget();

        Ok(())
    }

    fn cell_corner(cell: Point) -> (f64, f64) {
        (cell.x as f64 * SQUARE_SIZE, cell.y as f64 * SQUARE_SIZE)
    }
}

impl Surface for WebRenderer {
    fn clear(&mut self, background: Color, border: Color) -> io::Result<()> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        self.context.set_fill_style_str(background.css());
        self.context.set_stroke_style_str(border.css());
        self.context.fill_rect(0.0, 0.0, width, height);
        self.context.stroke_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn draw_square(&mut self, cell: Point, fill: Color, stroke: Color) -> io::Result<()> {
        let (x, y) = Self::cell_corner(cell);

        self.context.set_fill_style_str(fill.css());
        self.context.set_stroke_style_str(stroke.css());
        self.context.fill_rect(x, y, SQUARE_SIZE, SQUARE_SIZE);
        self.context.stroke_rect(x, y, SQUARE_SIZE, SQUARE_SIZE);
        Ok(())
    }

    fn draw_circle(&mut self, cell: Point, fill: Color, stroke: Color) -> io::Result<()> {
        let (x, y) = Self::cell_corner(cell);
        let radius = SQUARE_SIZE / 2.0;

        self.context.begin_path();
        self.context.set_fill_style_str(fill.css());
        self.context.set_stroke_style_str(stroke.css());
        self.context
            .arc(x + radius, y + radius, radius, 0.0, 2.0 * PI)
            .map_err(js_error)?;
        self.context.close_path();
        self.context.fill();
        self.context.stroke();
        Ok(())
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listener().map_err(js_error)?;
        self.setup_touch_listeners().map_err(js_error)?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        renderer::draw_frame(game, self)
    }

    fn update_score_text(&mut self, score: u32) -> io::Result<()> {
        self.score.set_inner_text(&renderer::score_text(score));
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().pop_front())
    }
}
