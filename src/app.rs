//! Browser glue: wires the page's controls to the round engine, drives the
//! one-second countdown with `setInterval`, runs the animation frame loop and
//! mirrors engine state into the HUD.
//!
//! All browser-side state lives in the `APP` thread local. Every callback
//! borrows it for the length of one event and hands it back.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, EventTarget, HtmlCanvasElement,
    HtmlInputElement, KeyboardEvent, Window, window,
};

use crate::config::RoundConfig;
use crate::effects::Scene;
use crate::error::GameError;
use crate::logging::{LoggingConfig, init_logging};
use crate::render::Renderer;
use crate::rng::SeededRandom;
use crate::round::{
    Clock, Difficulty, FeedbackEvent, FeedbackSink, Operation, Phase, RoundEngine, RoundSummary,
};
use crate::telegram::{Haptic, ImpactStyle, TelegramHost};

const HIDDEN: &str = "hidden";
const SELECTED: &str = "selected";
const FLASH_MS: i32 = 500;
const TICK_MS: i32 = 1000;

type Engine = RoundEngine<SeededRandom, IntervalClock, HostFeedback>;

// --- Capabilities backed by the browser ----------------------------------------

/// `setInterval` handle created on subscribe and cleared on unsubscribe.
pub struct IntervalClock {
    handle: Option<i32>,
    on_tick: Closure<dyn FnMut()>,
}

impl IntervalClock {
    fn new(on_tick: Closure<dyn FnMut()>) -> Self {
        Self {
            handle: None,
            on_tick,
        }
    }
}

impl Clock for IntervalClock {
    fn subscribe(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let Some(win) = window() else { return };
        match win.set_interval_with_callback_and_timeout_and_arguments_0(
            self.on_tick.as_ref().unchecked_ref(),
            TICK_MS,
        ) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::error!("failed to start round clock: {e:?}"),
        }
    }

    fn unsubscribe(&mut self) {
        if let (Some(handle), Some(win)) = (self.handle.take(), window()) {
            win.clear_interval_with_handle(handle);
        }
    }
}

/// Fires haptics straight away and queues events for the page to animate
/// once the engine call has returned.
pub struct HostFeedback {
    telegram: TelegramHost,
    report_summary: bool,
    pending: Vec<FeedbackEvent>,
}

impl HostFeedback {
    fn new(telegram: TelegramHost, report_summary: bool) -> Self {
        Self {
            telegram,
            report_summary,
            pending: Vec::new(),
        }
    }

    fn drain(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl FeedbackSink for HostFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        match &event {
            FeedbackEvent::Correct => self.telegram.haptic(Haptic::Success),
            FeedbackEvent::Incorrect => self.telegram.haptic(Haptic::Error),
            FeedbackEvent::InvalidInput => {}
            FeedbackEvent::RoundEnded(summary) if self.report_summary => {
                match serde_json::to_string(summary) {
                    Ok(json) => self.telegram.send_data(&json),
                    Err(e) => log::warn!("could not encode round summary: {e}"),
                }
            }
            FeedbackEvent::RoundEnded(_) => {}
        }
        self.pending.push(event);
    }
}

// --- Screens / back button -----------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Game,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackAction {
    /// Ask before abandoning a round in progress, then reload.
    ConfirmQuit,
    Reload,
    Close,
}

pub fn back_action(screen: Screen) -> BackAction {
    match screen {
        Screen::Game => BackAction::ConfirmQuit,
        Screen::GameOver => BackAction::Reload,
        Screen::Start => BackAction::Close,
    }
}

/// One heart per remaining life.
pub fn hearts(lives: u32) -> String {
    "❤️".repeat(lives as usize)
}

// --- App state -------------------------------------------------------------------

struct App {
    engine: Engine,
    scene: Scene,
    renderer: Renderer,
    telegram: TelegramHost,
    difficulty: Difficulty,
    operation: Operation,
    frame_running: bool,
    doc: Document,
    score_el: Element,
    lives_el: Element,
    time_el: Element,
    question_el: Element,
    input: HtmlInputElement,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

/// Run `f` against the app if it exists and is not already borrowed by an
/// outer event.
fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(f),
        Err(_) => {
            log::debug!("event dropped: app busy");
            None
        }
    })
}

fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::error!("{e:?}");
    }
}

impl App {
    fn start(&mut self) -> Result<(), JsValue> {
        set_hidden(&self.doc, "start-screen", true)?;
        set_hidden(&self.doc, "game-screen", false)?;
        self.engine.start_round(self.difficulty, self.operation);
        self.after_event()?;
        self.input.set_value("");
        self.input.focus()?;
        self.telegram.haptic(Haptic::Impact(ImpactStyle::Medium));
        self.telegram.show_back_button();
        self.ensure_frame_loop();
        Ok(())
    }

    fn submit(&mut self) -> Result<(), JsValue> {
        let text = self.input.value();
        match self.engine.submit_answer(&text) {
            Ok(_) => self.input.set_value(""),
            Err(GameError::InvalidInput { .. }) => {}
            Err(e) => log::debug!("answer ignored: {e}"),
        }
        self.after_event()
    }

    fn on_tick(&mut self) -> Result<(), JsValue> {
        if let Err(e) = self.engine.tick() {
            log::debug!("tick ignored: {e}");
        }
        self.after_event()
    }

    fn play_again(&mut self) -> Result<(), JsValue> {
        set_hidden(&self.doc, "game-over", true)?;
        set_hidden(&self.doc, "start-screen", false)?;
        self.scene.clear_particles();
        Ok(())
    }

    fn pick(&mut self, button: &Element, group: &str) -> Result<(), JsValue> {
        mark_selected(&self.doc, group, button)?;
        let picked = match group {
            "[data-level]" => button
                .get_attribute("data-level")
                .map(|v| v.parse::<Difficulty>().map(|d| self.difficulty = d)),
            _ => button
                .get_attribute("data-op")
                .map(|v| v.parse::<Operation>().map(|op| self.operation = op)),
        };
        if let Some(Err(e)) = picked {
            log::warn!("{e}");
        }
        self.telegram.haptic(Haptic::Selection);
        Ok(())
    }

    /// Play out queued feedback, then mirror engine state into the HUD.
    fn after_event(&mut self) -> Result<(), JsValue> {
        for event in self.engine.feedback_mut().drain() {
            match event {
                FeedbackEvent::Correct => {
                    self.scene.burst(true);
                    flash(&self.question_el, "correct-animation")?;
                }
                FeedbackEvent::Incorrect => {
                    self.scene.burst(false);
                    self.input.set_value("");
                    flash(&self.input, "wrong-animation")?;
                }
                FeedbackEvent::InvalidInput => flash(&self.input, "wrong-animation")?,
                FeedbackEvent::RoundEnded(summary) => self.show_game_over(summary)?,
            }
        }
        self.sync_hud();
        Ok(())
    }

    fn sync_hud(&self) {
        let Some(state) = self.engine.state() else { return };
        self.score_el.set_text_content(Some(&state.score.to_string()));
        self.lives_el.set_text_content(Some(&hearts(state.lives)));
        self.time_el
            .set_text_content(Some(&state.time_remaining.to_string()));
        if let Some(q) = &state.question {
            self.question_el.set_text_content(Some(&q.text()));
        }
    }

    fn show_game_over(&self, summary: RoundSummary) -> Result<(), JsValue> {
        set_hidden(&self.doc, "game-screen", true)?;
        set_hidden(&self.doc, "game-over", false)?;
        for (id, value) in [
            ("final-score", summary.final_score),
            ("correct-answers", summary.correct_count),
            ("best-streak", summary.best_streak),
        ] {
            element(&self.doc, id)?.set_text_content(Some(&value.to_string()));
        }
        Ok(())
    }

    fn ensure_frame_loop(&mut self) {
        if !self.frame_running {
            self.frame_running = true;
            request_frame();
        }
    }

    /// Step and paint one frame. Returns whether the loop should continue.
    fn frame(&mut self, now: f64) -> bool {
        self.scene.step(now);
        let streak = self.engine.state().map_or(0, |s| s.current_streak);
        let banner_from = self.engine.config().streak_bonus_threshold;
        if let Err(e) = self.renderer.draw(&self.scene, streak, banner_from) {
            log::error!("draw failed: {e:?}");
        }
        let keep_going = self.engine.phase() == Phase::Active;
        if !keep_going {
            self.frame_running = false;
        }
        keep_going
    }
}

fn request_frame() {
    FRAME.with(|cell| {
        if let (Some(cb), Some(win)) = (cell.borrow().as_ref(), window()) {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    });
}

// --- DOM helpers -------------------------------------------------------------------

fn element(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

fn set_hidden(doc: &Document, id: &str, hidden: bool) -> Result<(), JsValue> {
    let list = element(doc, id)?.class_list();
    if hidden {
        list.add_1(HIDDEN)
    } else {
        list.remove_1(HIDDEN)
    }
}

fn is_visible(doc: &Document, id: &str) -> bool {
    doc.get_element_by_id(id)
        .is_some_and(|el| !el.class_list().contains(HIDDEN))
}

fn current_screen(doc: &Document) -> Screen {
    if is_visible(doc, "game-screen") {
        Screen::Game
    } else if is_visible(doc, "game-over") {
        Screen::GameOver
    } else {
        Screen::Start
    }
}

fn elements(doc: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = doc.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn mark_selected(doc: &Document, group: &str, chosen: &Element) -> Result<(), JsValue> {
    for el in elements(doc, group)? {
        el.class_list().remove_1(SELECTED)?;
    }
    chosen.class_list().add_1(SELECTED)
}

/// Add a CSS animation class and take it off again after `FLASH_MS`.
fn flash(el: &Element, class: &'static str) -> Result<(), JsValue> {
    el.class_list().add_1(class)?;
    let target = el.clone();
    let undo = Closure::once_into_js(move || {
        let _ = target.class_list().remove_1(class);
    });
    if let Some(win) = window() {
        win.set_timeout_with_callback_and_timeout_and_arguments_0(undo.unchecked_ref(), FLASH_MS)?;
    }
    Ok(())
}

fn refocus_soon(input: &HtmlInputElement) -> Result<(), JsValue> {
    let input = input.clone();
    let cb = Closure::once_into_js(move || {
        let _ = input.focus();
    });
    if let Some(win) = window() {
        win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 0)?;
    }
    Ok(())
}

fn on(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn handle_back(win: &Window, doc: &Document, telegram: &TelegramHost) -> Result<(), JsValue> {
    match back_action(current_screen(doc)) {
        BackAction::ConfirmQuit => {
            if win.confirm_with_message("Are you sure you want to quit the game?")? {
                win.location().reload()?;
            }
        }
        BackAction::Reload => win.location().reload()?,
        BackAction::Close => telegram.close(),
    }
    Ok(())
}

// --- Entry -----------------------------------------------------------------------

/// Build the app against the current page and wire every control.
/// `config_json` optionally overrides [`RoundConfig`] defaults.
pub fn start_app(config_json: Option<String>) -> Result<(), JsValue> {
    init_logging(LoggingConfig::default());

    let config = match config_json {
        Some(json) => {
            RoundConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        None => RoundConfig::default(),
    };

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = element(&doc, "gameCanvas")?.dyn_into()?;
    canvas.set_width(canvas.offset_width().max(1) as u32);
    canvas.set_height(canvas.offset_height().max(1) as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    let renderer = Renderer::new(canvas, ctx);

    let telegram = TelegramHost::detect();
    {
        let (win, doc, tg) = (win.clone(), doc.clone(), telegram.clone());
        let on_back = Closure::wrap(Box::new(move || {
            report(handle_back(&win, &doc, &tg));
        }) as Box<dyn FnMut()>);
        telegram.init(on_back.as_ref().unchecked_ref());
        on_back.forget();
    }
    if let Some(name) = telegram.user().and_then(|u| u.first_name) {
        log::info!("Welcome {name}!");
    }

    let on_tick = Closure::wrap(Box::new(|| {
        with_app(|app| report(app.on_tick()));
    }) as Box<dyn FnMut()>);
    let rng = SeededRandom::from_entropy();
    log::debug!("question seed {}", rng.seed());
    let engine = RoundEngine::new(
        config.clone(),
        rng,
        IntervalClock::new(on_tick),
        HostFeedback::new(telegram.clone(), config.report_summary),
    );
    let scene = Scene::new(renderer.width(), renderer.height(), SeededRandom::from_entropy());

    let input: HtmlInputElement = element(&doc, "answer")?.dyn_into()?;
    let app = App {
        engine,
        scene,
        renderer,
        telegram,
        difficulty: Difficulty::default(),
        operation: Operation::default(),
        frame_running: false,
        score_el: element(&doc, "score")?,
        lives_el: element(&doc, "lives")?,
        time_el: element(&doc, "time")?,
        question_el: element(&doc, "question")?,
        input: input.clone(),
        doc: doc.clone(),
    };
    APP.with(|cell| cell.replace(Some(app)));

    let frame = Closure::wrap(Box::new(|ts: f64| {
        if with_app(|app| app.frame(ts)).unwrap_or(false) {
            request_frame();
        }
    }) as Box<dyn FnMut(f64)>);
    FRAME.with(|cell| cell.replace(Some(frame)));

    for group in ["[data-level]", "[data-op]"] {
        for button in elements(&doc, group)? {
            let chosen = button.clone();
            on(&button, "click", move |_| {
                with_app(|app| report(app.pick(&chosen, group)));
            })?;
        }
    }

    let start = element(&doc, "start-btn")?;
    on(&start, "click", |_| {
        with_app(|app| report(app.start()));
    })?;

    let submit = element(&doc, "submit-answer")?;
    // Keep the on-screen keyboard up: the button must never take focus.
    on(&submit, "mousedown", |evt| evt.prevent_default())?;
    on(&submit, "touchstart", |evt| evt.prevent_default())?;
    {
        let input = input.clone();
        on(&submit, "click", move |evt| {
            evt.prevent_default();
            with_app(|app| report(app.submit()));
            report(refocus_soon(&input));
        })?;
    }

    on(&input, "keypress", |evt| {
        let enter = evt
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|k| k.key() == "Enter");
        if enter {
            evt.prevent_default();
            with_app(|app| report(app.submit()));
        }
    })?;
    {
        let (doc, refocus) = (doc.clone(), input.clone());
        on(&input, "blur", move |_| {
            if is_visible(&doc, "game-screen") {
                report(refocus_soon(&refocus));
            }
        })?;
    }

    let again = element(&doc, "play-again")?;
    on(&again, "click", |_| {
        with_app(|app| report(app.play_again()));
    })?;

    log::info!("math sprint ready");
    Ok(())
}
