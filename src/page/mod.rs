//! Page controller: wires the clock, spawn schedule and wandering cats to the DOM.
//!
//! All state lives in a thread-local `PageState`; every browser callback
//! (clicks, the 1 s interval, animation frames) borrows it for the duration of
//! one handler. Callbacks are created once and leaked with `forget()`, the
//! interval itself is armed / cleared by handle.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlImageElement, window};

use crate::clock::{ElapsedClock, ZERO_DISPLAY, format_hms};
use crate::config::ClockConfig;
use crate::interval::{INVALID_INTERVAL_MESSAGE, SettingsError, SpawnInterval, SpawnSchedule};
use crate::placement::place_avoiding;
use crate::rng::BrowserRng;
use crate::walker::{CatWalker, Heading};

mod dom;
use dom::PageElements;

/// Upper bound on walk steps replayed in one frame (e.g. after a background tab wakes up).
const MAX_STEPS_PER_FRAME: u32 = 8;

struct LiveCat {
    img: HtmlImageElement,
    walker: CatWalker,
}

/// Runtime page state.
struct PageState {
    els: PageElements,
    config: ClockConfig,
    clock: ElapsedClock,
    schedule: SpawnSchedule,
    interval_handle: Option<i32>,
    cats: Vec<LiveCat>,
    rng: BrowserRng,
}

thread_local! {
    static PAGE_STATE: RefCell<Option<PageState>> = const { RefCell::new(None) };
    static TICK_CALLBACK: RefCell<Option<Closure<dyn FnMut()>>> = const { RefCell::new(None) };
    static PENDING_CONFIG: RefCell<Option<ClockConfig>> = const { RefCell::new(None) };
}

/// Replace the config. Before start it is picked up by `start_clock()`; after
/// start it applies immediately (tick period on the next play).
#[cfg_attr(not(feature = "serde_json"), allow(dead_code))]
pub(crate) fn set_config(config: ClockConfig) {
    let pending = PAGE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(st) => {
            st.config = config;
            None
        }
        None => Some(config),
    });
    if pending.is_some() {
        PENDING_CONFIG.with(|c| c.replace(pending));
    }
}

#[wasm_bindgen]
pub fn start_clock() -> Result<(), JsValue> {
    if PAGE_STATE.with(|cell| cell.borrow().is_some()) {
        console_log!("cat clock already running on this page");
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let els = PageElements::find_or_create(&doc)?;
    els.print(ZERO_DISPLAY);
    els.set_toggle_icon(false)?;

    install_listeners(&els)?;

    let config = PENDING_CONFIG.with(|c| c.borrow_mut().take()).unwrap_or_default();
    let state = PageState {
        els,
        config,
        clock: ElapsedClock::new(),
        schedule: SpawnSchedule::new(),
        interval_handle: None,
        cats: Vec::new(),
        rng: BrowserRng::new(),
    };
    PAGE_STATE.with(|cell| cell.replace(Some(state)));

    install_tick_callback();
    start_animation_loop();
    console_log!("cat clock ready");
    Ok(())
}

fn with_state(f: impl FnOnce(&mut PageState)) {
    PAGE_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            f(st);
        }
    });
}

// --- Listeners ----------------------------------------------------------------

fn install_listeners(els: &PageElements) -> Result<(), JsValue> {
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(on_toggle_click);
        }) as Box<dyn FnMut(_)>);
        els.toggle_btn
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(restart);
        }) as Box<dyn FnMut(_)>);
        els.restart_btn
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Settings modal open / close
    for (target, show) in [(&els.open_settings_btn, true), (&els.close_settings_btn, false)] {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_state(|st| {
                st.els.show_settings(show).ok();
            });
        }) as Box<dyn FnMut(_)>);
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Escape also closes the settings modal
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Escape" {
                with_state(|st| {
                    st.els.show_settings(false).ok();
                });
            }
        }) as Box<dyn FnMut(_)>);
        els.document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn on_toggle_click(st: &mut PageState) {
    let run = !st.clock.is_running();
    if run {
        // Refuse to start on a bad interval
        if let Err(err) = read_interval(st) {
            report_invalid(&err);
            return;
        }
    }
    set_running(st, run);
}

fn read_interval(st: &PageState) -> Result<SpawnInterval, SettingsError> {
    let (value, unit) = st.els.interval_fields();
    SpawnInterval::parse(&value, &unit)
}

fn report_invalid(err: &SettingsError) {
    console_log!("{err}");
    if let Some(w) = window() {
        w.alert_with_message(INVALID_INTERVAL_MESSAGE).ok();
    }
}

// --- Timer --------------------------------------------------------------------

fn install_tick_callback() {
    let closure = Closure::wrap(Box::new(move || {
        with_state(on_tick);
    }) as Box<dyn FnMut()>);
    TICK_CALLBACK.with(|cb| cb.replace(Some(closure)));
}

fn arm_interval(period_ms: u32) -> Option<i32> {
    let win = window()?;
    let timeout = period_ms.min(i32::MAX as u32) as i32;
    TICK_CALLBACK.with(|cb| {
        cb.borrow().as_ref().and_then(|c| {
            win.set_interval_with_callback_and_timeout_and_arguments_0(
                c.as_ref().unchecked_ref(),
                timeout,
            )
            .ok()
        })
    })
}

fn disarm_interval(st: &mut PageState) {
    if let Some(handle) = st.interval_handle.take() {
        if let Some(w) = window() {
            w.clear_interval_with_handle(handle);
        }
    }
}

fn set_running(st: &mut PageState, run: bool) {
    let now = crate::performance_now();
    if run {
        st.clock.start(now);
        st.schedule.rebase(st.clock.elapsed_ms());
        for cat in &mut st.cats {
            cat.walker.resync(now);
        }
        if st.interval_handle.is_none() {
            st.interval_handle = arm_interval(st.config.tick_ms);
        }
        console_log!("timer running from {}", format_hms(st.clock.elapsed_ms()));
    } else {
        st.clock.pause(now);
        disarm_interval(st);
        console_log!("timer paused at {}", format_hms(st.clock.elapsed_ms()));
    }
    st.els.set_toggle_icon(run).ok();
}

fn on_tick(st: &mut PageState) {
    let now = crate::performance_now();
    let elapsed = st.clock.tick(now);
    st.els.print(&format_hms(elapsed));

    // Interval is re-read every tick so edits apply without a restart
    let interval = match read_interval(st) {
        Ok(iv) => iv,
        Err(err) => {
            set_running(st, false);
            report_invalid(&err);
            return;
        }
    };
    let due = st.schedule.due(elapsed, interval.as_ms());
    let batch = st.config.spawn_batch(due);
    if batch < due {
        console_log!("{} intervals passed, spawning only the newest {}", due, batch);
    }
    for _ in 0..batch {
        if let Err(e) = spawn_cat(st, now) {
            console_log!("cat spawn failed: {:?}", e);
            break;
        }
    }
}

fn restart(st: &mut PageState) {
    disarm_interval(st);
    st.clock.reset();
    st.schedule.reset();
    st.els.print(ZERO_DISPLAY);
    for cat in st.cats.drain(..) {
        cat.img.remove();
    }
    st.els.cat_container.set_inner_html("");
    set_running(st, false);
    console_log!("timer reset");
}

// --- Cats ---------------------------------------------------------------------

fn spawn_cat(st: &mut PageState, now: f64) -> Result<(), JsValue> {
    let img: HtmlImageElement = st.els.document.create_element("img")?.dyn_into()?;
    let heading = Heading::random(&mut st.rng);
    img.set_src(&heading.sprite_path(&st.config.sprite_base));
    img.set_alt("Cute cat");
    img.class_list().add_1("cat")?;

    let size = st.config.cat_size_px;
    let (area_w, area_h) = st.els.container_size();
    let obstacles = st.els.ui_obstacles();
    let spot = place_avoiding(
        area_w,
        area_h,
        size,
        size,
        &obstacles,
        &mut st.rng,
        st.config.max_placement_attempts,
    );
    if !spot.clear {
        console_log!(
            "no clear spot after {} attempts, cat may overlap the controls",
            st.config.max_placement_attempts
        );
    }

    let style = img.style();
    style.set_property("position", "absolute")?;
    style.set_property("width", &format!("{size}px"))?;
    style.set_property("height", &format!("{size}px"))?;
    style.set_property("left", &format!("{}px", spot.x))?;
    style.set_property("top", &format!("{}px", spot.y))?;
    st.els.cat_container.append_child(&img)?;

    st.cats.push(LiveCat {
        img,
        walker: CatWalker::new(spot.x, spot.y, size, heading, now),
    });
    if st.config.max_cats > 0 && st.cats.len() > st.config.max_cats {
        let oldest = st.cats.remove(0);
        oldest.img.remove();
    }
    console_log!("cat spawned ({} on screen)", st.cats.len());
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_animation_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_state(|st| animate_cats(st, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn animate_cats(st: &mut PageState, now: f64) {
    // Cats hold still while the clock is paused
    if !st.clock.is_running() || st.cats.is_empty() {
        return;
    }
    let (area_w, area_h) = st.els.container_size();
    let cfg = &st.config;
    for cat in &mut st.cats {
        let steps = cat.walker.steps_due(now, cfg.walk_step_ms);
        if steps == 0 {
            continue;
        }
        let mut turned = false;
        for _ in 0..steps.min(MAX_STEPS_PER_FRAME) {
            turned |= cat.walker.step(
                area_w,
                area_h,
                cfg.walk_step_px,
                cfg.turn_every_steps,
                &mut st.rng,
            );
        }
        let style = cat.img.style();
        style
            .set_property("left", &format!("{}px", cat.walker.x))
            .ok();
        style
            .set_property("top", &format!("{}px", cat.walker.y))
            .ok();
        if turned {
            cat.img
                .set_src(&cat.walker.heading.sprite_path(&cfg.sprite_base));
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    // Headless runners cannot dismiss a modal alert.
    fn start_quietly() {
        start_clock().expect("start");
        let win = window().expect("window");
        js_sys::Reflect::set(
            &win,
            &JsValue::from_str("alert"),
            &js_sys::Function::new_no_args(""),
        )
        .expect("stub alert");
    }

    /// Pretend `ms` more of running time passed before the next tick.
    fn fast_forward(st: &mut PageState, ms: f64) {
        let now = crate::performance_now();
        let target = st.clock.tick(now) + ms;
        st.clock = ElapsedClock::new();
        st.clock.start(now - target);
    }

    fn running_with_interval(st: &mut PageState, value: &str) {
        restart(st);
        st.els.interval_input.set_value(value);
        st.els.interval_unit.set_value("seconds");
        set_running(st, true);
    }

    #[wasm_bindgen_test]
    fn test_tick_evicts_oldest_and_restart_clears() {
        start_quietly();
        with_state(|st| {
            st.config.max_cats = 3;
            running_with_interval(st, "1");

            fast_forward(st, 2_500.0);
            on_tick(st);
            assert_eq!(st.cats.len(), 2);
            let oldest = st.cats[0].img.clone();

            fast_forward(st, 2_000.0);
            on_tick(st);
            assert_eq!(st.cats.len(), 3);
            assert!(oldest.parent_node().is_none(), "oldest cat left in the DOM");
            assert_eq!(st.els.cat_container.child_element_count(), 3);

            // An hour of missed ticks only builds up to the cap
            fast_forward(st, 3_600_000.0);
            on_tick(st);
            assert_eq!(st.cats.len(), 3);
            assert_eq!(st.els.cat_container.child_element_count(), 3);

            restart(st);
            assert!(st.cats.is_empty());
            assert_eq!(st.els.cat_container.child_element_count(), 0);
            assert!(!st.clock.is_running());
            assert_eq!(st.els.clock.text_content().as_deref(), Some(ZERO_DISPLAY));
            st.config = ClockConfig::default();
        });
    }

    #[wasm_bindgen_test]
    fn test_invalid_interval_mid_run_pauses() {
        start_quietly();
        with_state(|st| {
            running_with_interval(st, "5");
            assert!(st.interval_handle.is_some());
            fast_forward(st, 1_000.0);
            st.els.interval_input.set_value("0");
            on_tick(st);
            assert!(!st.clock.is_running());
            assert!(st.interval_handle.is_none());
            assert!(st.cats.is_empty());
            assert_eq!(
                st.els.toggle_btn.get_attribute("aria-label").as_deref(),
                Some("Start Timer")
            );
            restart(st);
        });
    }
}
