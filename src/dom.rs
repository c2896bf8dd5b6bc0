//! Browser shell for the carrot field: DOM construction, event wiring, audio
//! cues, and the one-second countdown interval.
//!
//! All game decisions live in [`crate::round`]; this module only translates
//! DOM events into controller calls and view callbacks into DOM mutations.
//! The one shell-owned invariant that matters for correctness is the interval
//! handle: it is cleared on every transition out of `Running` so no stray
//! tick fires after round end (the controller's phase guard backstops this).

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAudioElement, MouseEvent, window};

use crate::round::placement::Lcg;
use crate::round::{
    FieldBounds, Item, ItemId, ItemKind, RoundConfig, RoundController, RoundView, SoundBank,
    SoundCue,
};

// --- Element ids & assets ----------------------------------------------------

const FIELD_ID: &str = "cr-field";
const BUTTON_ID: &str = "cr-button";
const TIMER_ID: &str = "cr-timer";
const SCORE_ID: &str = "cr-score";
const POPUP_ID: &str = "cr-popup";
const POPUP_MSG_ID: &str = "cr-popup-msg";
const POPUP_REPLAY_ID: &str = "cr-popup-replay";

/// Attribute stamped on item images so clicks resolve back to an [`ItemId`].
const ITEM_ATTR: &str = "data-item";

// Asset paths are relative to the hosting page.
const CARROT_IMG: &str = "img/carrot.png";
const BUG_IMG: &str = "img/bug.png";
const CARROT_SOUND: &str = "sound/carrot_pull.mp3";
const BUG_SOUND: &str = "sound/bug_pull.mp3";
const ALERT_SOUND: &str = "sound/alert.wav";
const WIN_SOUND: &str = "sound/game_win.mp3";
const BG_SOUND: &str = "sound/bg.mp3";

// --- Inline styles -----------------------------------------------------------

const FIELD_STYLE: &str = "position:relative; width:800px; height:500px; margin:64px auto 0; background:#73b94e; border:2px solid #2f5d1e; border-radius:14px; overflow:hidden;";
const BUTTON_STYLE: &str = "position:fixed; top:12px; left:50%; transform:translateX(-50%); font-size:22px; padding:4px 16px; background:#fff3d6; border:2px solid #2f5d1e; border-radius:8px; cursor:pointer; z-index:30;";
const TIMER_STYLE: &str = "position:fixed; top:14px; left:12px; font-family:'Fira Code', monospace; font-size:18px; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:30;";
const SCORE_STYLE: &str = "position:fixed; top:14px; right:12px; font-family:'Fira Code', monospace; font-size:18px; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ff9f43; z-index:30;";
const POPUP_STYLE: &str = "position:fixed; left:50%; top:40%; transform:translate(-50%,-50%); text-align:center; padding:18px 28px; background:rgba(0,0,0,0.78); border:1px solid #333; border-radius:10px; color:#fff; font-family:'Fira Code', monospace; z-index:50;";
const REPLAY_STYLE: &str =
    "display:block; margin:12px auto 0; font-size:18px; padding:2px 12px; cursor:pointer;";

/// Countdown text, minutes and seconds.
pub fn format_clock(secs: u32) -> String {
    format!("{} : {}", secs / 60, secs % 60)
}

fn set_shown(el: &Element, base: &str, shown: bool) {
    let vis = if shown { "visible" } else { "hidden" };
    el.set_attribute("style", &format!("{base} visibility:{vis};"))
        .ok();
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

// --- View over the real DOM --------------------------------------------------

struct DomView {
    doc: Document,
}

impl DomView {
    fn by_id(&self, id: &str) -> Option<Element> {
        self.doc.get_element_by_id(id)
    }
}

impl RoundView for DomView {
    fn clear_field(&mut self) {
        if let Some(field) = self.by_id(FIELD_ID) {
            field.set_inner_html("");
        }
    }

    fn place_item(&mut self, item: &Item) {
        let Some(field) = self.by_id(FIELD_ID) else {
            return;
        };
        let Ok(img) = self.doc.create_element("img") else {
            return;
        };
        let (class, src) = match item.kind {
            ItemKind::Carrot => ("carrot", CARROT_IMG),
            ItemKind::Bug => ("bug", BUG_IMG),
        };
        img.set_attribute("class", class).ok();
        img.set_attribute("src", src).ok();
        img.set_attribute(ITEM_ATTR, &item.id.0.to_string()).ok();
        img.set_attribute(
            "style",
            &format!("position:absolute; left:{}px; top:{}px;", item.x, item.y),
        )
        .ok();
        field.append_child(&img).ok();
    }

    fn remove_item(&mut self, id: ItemId) {
        if let Some(field) = self.by_id(FIELD_ID) {
            if let Ok(Some(el)) = field.query_selector(&format!("[{}='{}']", ITEM_ATTR, id.0)) {
                el.remove();
            }
        }
    }

    fn show_timer(&mut self, remaining_secs: u32) {
        if let Some(el) = self.by_id(TIMER_ID) {
            el.set_text_content(Some(&format_clock(remaining_secs)));
        }
    }

    fn show_score(&mut self, carrots_left: u32) {
        if let Some(el) = self.by_id(SCORE_ID) {
            el.set_text_content(Some(&carrots_left.to_string()));
        }
    }

    fn show_stop_button(&mut self) {
        if let Some(el) = self.by_id(BUTTON_ID) {
            el.set_text_content(Some("■"));
            set_shown(&el, BUTTON_STYLE, true);
        }
    }

    fn hide_button(&mut self) {
        if let Some(el) = self.by_id(BUTTON_ID) {
            set_shown(&el, BUTTON_STYLE, false);
        }
    }

    fn show_hud(&mut self) {
        if let Some(el) = self.by_id(TIMER_ID) {
            set_shown(&el, TIMER_STYLE, true);
        }
        if let Some(el) = self.by_id(SCORE_ID) {
            set_shown(&el, SCORE_STYLE, true);
        }
    }

    fn show_prompt(&mut self, text: &str) {
        if let Some(msg) = self.by_id(POPUP_MSG_ID) {
            msg.set_text_content(Some(text));
        }
        if let Some(popup) = self.by_id(POPUP_ID) {
            set_shown(&popup, POPUP_STYLE, true);
        }
    }
}

// --- Audio -------------------------------------------------------------------

struct DomSounds {
    carrot: HtmlAudioElement,
    bug: HtmlAudioElement,
    alert: HtmlAudioElement,
    win: HtmlAudioElement,
    background: HtmlAudioElement,
}

impl DomSounds {
    fn load() -> Result<Self, JsValue> {
        let background = HtmlAudioElement::new_with_src(BG_SOUND)?;
        background.set_loop(true);
        Ok(Self {
            carrot: HtmlAudioElement::new_with_src(CARROT_SOUND)?,
            bug: HtmlAudioElement::new_with_src(BUG_SOUND)?,
            alert: HtmlAudioElement::new_with_src(ALERT_SOUND)?,
            win: HtmlAudioElement::new_with_src(WIN_SOUND)?,
            background,
        })
    }

    fn element(&self, cue: SoundCue) -> &HtmlAudioElement {
        match cue {
            SoundCue::CarrotPull => &self.carrot,
            SoundCue::BugPull => &self.bug,
            SoundCue::Alert => &self.alert,
            SoundCue::Win => &self.win,
            SoundCue::Background => &self.background,
        }
    }
}

impl SoundBank for DomSounds {
    fn play(&mut self, cue: SoundCue) {
        let el = self.element(cue);
        el.set_current_time(0.0);
        // Autoplay policy may reject the promise; the game plays on without.
        let _ = el.play();
    }

    fn stop(&mut self, cue: SoundCue) {
        let _ = self.element(cue).pause();
    }
}

// --- Shell state -------------------------------------------------------------

struct App {
    round: RoundController,
    view: DomView,
    sounds: DomSounds,
    rng: Lcg,
    timer_id: Option<i32>,
}

impl App {
    fn start(&mut self) {
        let bounds = measure_field(&self.view.doc);
        self.round
            .start(bounds, &mut self.rng, &mut self.view, &mut self.sounds);
        self.arm_timer();
        log("round started");
    }

    fn abort(&mut self) {
        self.round.abort(&mut self.view, &mut self.sounds);
        self.disarm_timer();
        log("round aborted");
    }

    fn tick_once(&mut self) {
        self.round.tick(&mut self.view, &mut self.sounds);
        if !self.round.is_running() {
            self.disarm_timer();
        }
    }

    fn click(&mut self, target: Option<ItemId>) {
        self.round
            .field_click(target, &mut self.view, &mut self.sounds);
        if !self.round.is_running() {
            self.disarm_timer();
        }
    }

    fn arm_timer(&mut self) {
        self.disarm_timer();
        let Some(win) = window() else {
            return;
        };
        TICK_CB.with(|cb| {
            if let Some(cb) = cb.borrow().as_ref() {
                if let Ok(id) = win.set_interval_with_callback_and_timeout_and_arguments_0(
                    cb.as_ref().unchecked_ref(),
                    1_000,
                ) {
                    self.timer_id = Some(id);
                }
            }
        });
    }

    fn disarm_timer(&mut self) {
        if let Some(id) = self.timer_id.take() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(id);
            }
        }
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
    // Single tick closure for the whole session; kept alive here instead of
    // `forget` so repeated rounds do not leak one closure each.
    static TICK_CB: RefCell<Option<Closure<dyn FnMut()>>> = RefCell::new(None);
}

// --- Mounting ----------------------------------------------------------------

/// Build the UI (if absent), wire listeners, and park the controller in the
/// thread-local cell. Idempotent: a second call is a no-op.
pub fn mount() -> Result<(), JsValue> {
    if APP.with(|a| a.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    ensure_ui(&doc)?;

    #[cfg(feature = "rng")]
    let rng = Lcg::seed_from_entropy();
    #[cfg(not(feature = "rng"))]
    let rng = Lcg::new(performance_seed());

    let app = App {
        round: RoundController::new(RoundConfig::default()),
        view: DomView { doc: doc.clone() },
        sounds: DomSounds::load()?,
        rng,
        timer_id: None,
    };
    APP.with(|a| a.replace(Some(app)));

    // Countdown tick, shared across rounds.
    let tick = Closure::wrap(Box::new(move || {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                app.tick_once();
            }
        });
    }) as Box<dyn FnMut()>);
    TICK_CB.with(|c| c.replace(Some(tick)));

    // Start / stop button toggle.
    {
        let button = doc
            .get_element_by_id(BUTTON_ID)
            .ok_or_else(|| JsValue::from_str("no game button"))?;
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    if app.round.is_running() {
                        app.abort();
                    } else {
                        app.start();
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Field clicks, delegated from the container to whatever item was hit.
    {
        let field = doc
            .get_element_by_id(FIELD_ID)
            .ok_or_else(|| JsValue::from_str("no game field"))?;
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let target = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute(ITEM_ATTR))
                .and_then(|v| v.parse::<u32>().ok())
                .map(ItemId);
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.click(target);
                }
            });
        }) as Box<dyn FnMut(_)>);
        field.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Replay: hide the prompt and start over.
    {
        let replay = doc
            .get_element_by_id(POPUP_REPLAY_ID)
            .ok_or_else(|| JsValue::from_str("no replay button"))?;
        let doc_replay = doc.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            if let Some(popup) = doc_replay.get_element_by_id(POPUP_ID) {
                set_shown(&popup, POPUP_STYLE, false);
            }
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.start();
                }
            });
        }) as Box<dyn FnMut(_)>);
        replay.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log("carrot field mounted");
    Ok(())
}

/// Create the fixed UI elements under `body` if the hosting page did not ship
/// them. Ids are stable so a hand-written page can restyle freely.
fn ensure_ui(doc: &Document) -> Result<(), JsValue> {
    let body = doc
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    if doc.get_element_by_id(FIELD_ID).is_none() {
        let field = doc.create_element("div")?;
        field.set_id(FIELD_ID);
        field.set_attribute("style", FIELD_STYLE).ok();
        body.append_child(&field)?;
    }
    if doc.get_element_by_id(BUTTON_ID).is_none() {
        let button = doc.create_element("button")?;
        button.set_id(BUTTON_ID);
        button.set_text_content(Some("▶"));
        set_shown(&button, BUTTON_STYLE, true);
        body.append_child(&button)?;
    }
    if doc.get_element_by_id(TIMER_ID).is_none() {
        let timer = doc.create_element("div")?;
        timer.set_id(TIMER_ID);
        set_shown(&timer, TIMER_STYLE, false);
        body.append_child(&timer)?;
    }
    if doc.get_element_by_id(SCORE_ID).is_none() {
        let score = doc.create_element("div")?;
        score.set_id(SCORE_ID);
        set_shown(&score, SCORE_STYLE, false);
        body.append_child(&score)?;
    }
    if doc.get_element_by_id(POPUP_ID).is_none() {
        let popup = doc.create_element("div")?;
        popup.set_id(POPUP_ID);
        let msg = doc.create_element("div")?;
        msg.set_id(POPUP_MSG_ID);
        let replay = doc.create_element("button")?;
        replay.set_id(POPUP_REPLAY_ID);
        replay.set_text_content(Some("↻"));
        replay.set_attribute("style", REPLAY_STYLE).ok();
        popup.append_child(&msg)?;
        popup.append_child(&replay)?;
        set_shown(&popup, POPUP_STYLE, false);
        body.append_child(&popup)?;
    }
    Ok(())
}

fn measure_field(doc: &Document) -> FieldBounds {
    doc.get_element_by_id(FIELD_ID)
        .map(|field| {
            let rect = field.get_bounding_client_rect();
            FieldBounds {
                width: rect.width(),
                height: rect.height(),
            }
        })
        .unwrap_or(FieldBounds {
            width: 800.0,
            height: 500.0,
        })
}

#[cfg(not(feature = "rng"))]
fn performance_seed() -> u64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
        .to_bits()
}
