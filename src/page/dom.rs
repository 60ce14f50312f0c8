//! Element lookups for the cat clock page. The page ships its own markup; any
//! expected element it lacks is filled in from a small per-id fallback.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::placement::Rect;

/// Fallback markup for one expected id: the id, the id of the element it goes
/// into (`None` = `<body>`), and the HTML appended there.
struct Fallback {
    id: &'static str,
    parent: Option<&'static str>,
    html: &'static str,
}

// Parents come before their children so a created modal receives its fields.
const FALLBACKS: [Fallback; 9] = [
    Fallback {
        id: "catContainer",
        parent: None,
        html: r#"<div id="catContainer" style="position:fixed; inset:0; overflow:hidden; z-index:1;"></div>"#,
    },
    Fallback {
        id: "clock",
        parent: None,
        html: r#"<div id="clock" style="position:fixed; left:50%; top:40%; transform:translate(-50%,-50%); font:64px 'Fira Code', monospace; z-index:10;">00:00:00</div>"#,
    },
    Fallback {
        id: "settingsModal",
        parent: None,
        html: r#"<style>.hidden { display:none !important; }</style><div id="settingsModal" class="hidden" style="position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); padding:16px; background:#fff; border-radius:12px; z-index:30;"></div>"#,
    },
    Fallback {
        id: "toggleBtn",
        parent: Some("controls"),
        html: r#"<button id="toggleBtn" aria-label="Start Timer"><i class="fa-solid fa-play"></i></button>"#,
    },
    Fallback {
        id: "restartBtn",
        parent: Some("controls"),
        html: r#"<button id="restartBtn" aria-label="Restart Timer"><i class="fa-solid fa-rotate-left"></i></button>"#,
    },
    Fallback {
        id: "openSettingsBtn",
        parent: Some("controls"),
        html: r#"<button id="openSettingsBtn" aria-label="Settings"><i class="fa-solid fa-gear"></i></button>"#,
    },
    Fallback {
        id: "intervalInput",
        parent: Some("settingsModal"),
        html: r#"<label for="intervalInput">Spawn a cat every</label> <input id="intervalInput" type="number" min="1" value="10">"#,
    },
    Fallback {
        id: "intervalUnit",
        parent: Some("settingsModal"),
        html: r#"<select id="intervalUnit"><option value="seconds">seconds</option><option value="minutes">minutes</option></select>"#,
    },
    Fallback {
        id: "closeSettingsBtn",
        parent: Some("settingsModal"),
        html: r#"<button id="closeSettingsBtn">Close</button>"#,
    },
];

/// Control bar, only created when one of its buttons is missing.
const CONTROLS_HTML: &str = r#"<div id="controls" style="position:fixed; left:50%; top:55%; transform:translate(-50%,-50%); display:flex; gap:12px; z-index:10;"></div>"#;

/// Handles to every element the page scripts touch.
pub(crate) struct PageElements {
    pub document: Document,
    pub clock: Element,
    pub toggle_btn: HtmlElement,
    pub restart_btn: HtmlElement,
    pub interval_input: HtmlInputElement,
    pub interval_unit: HtmlSelectElement,
    pub cat_container: HtmlElement,
    pub open_settings_btn: HtmlElement,
    pub close_settings_btn: HtmlElement,
    pub settings_modal: Element,
    /// Control bar; falls back to the toggle button's parent.
    pub controls: Option<Element>,
}

impl PageElements {
    pub fn find_or_create(doc: &Document) -> Result<Self, JsValue> {
        ensure_layout(doc)?;
        let toggle_btn: HtmlElement = by_id(doc, "toggleBtn")?;
        let controls = doc
            .get_element_by_id("controls")
            .or_else(|| toggle_btn.parent_element())
            .filter(|el| el.tag_name() != "BODY");
        Ok(Self {
            document: doc.clone(),
            clock: by_id(doc, "clock")?,
            toggle_btn,
            restart_btn: by_id(doc, "restartBtn")?,
            interval_input: by_id(doc, "intervalInput")?,
            interval_unit: by_id(doc, "intervalUnit")?,
            cat_container: by_id(doc, "catContainer")?,
            open_settings_btn: by_id(doc, "openSettingsBtn")?,
            close_settings_btn: by_id(doc, "closeSettingsBtn")?,
            settings_modal: by_id(doc, "settingsModal")?,
            controls,
        })
    }

    pub fn print(&self, txt: &str) {
        self.clock.set_text_content(Some(txt));
    }

    pub fn set_toggle_icon(&self, running: bool) -> Result<(), JsValue> {
        let (icon, label) = if running {
            ("fa-pause", "Pause Timer")
        } else {
            ("fa-play", "Start Timer")
        };
        self.toggle_btn
            .set_inner_html(&format!("<i class=\"fa-solid {icon}\"></i>"));
        self.toggle_btn.set_attribute("aria-label", label)
    }

    pub fn interval_fields(&self) -> (String, String) {
        (self.interval_input.value(), self.interval_unit.value())
    }

    pub fn show_settings(&self, show: bool) -> Result<(), JsValue> {
        let classes = self.settings_modal.class_list();
        if show {
            classes.remove_1("hidden")
        } else {
            classes.add_1("hidden")
        }
    }

    /// Container size in CSS pixels.
    pub fn container_size(&self) -> (f64, f64) {
        let r = self.cat_container.get_bounding_client_rect();
        (r.width(), r.height())
    }

    /// Clock and control bar rectangles translated into container coordinates.
    pub fn ui_obstacles(&self) -> Vec<Rect> {
        let origin = self.cat_container.get_bounding_client_rect();
        std::iter::once(&self.clock)
            .chain(self.controls.as_ref())
            .map(|el| {
                let r = el.get_bounding_client_rect();
                Rect::new(
                    r.left() - origin.left(),
                    r.top() - origin.top(),
                    r.width(),
                    r.height(),
                )
            })
            .collect()
    }
}

fn by_id<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected element type")))
}

fn ensure_layout(doc: &Document) -> Result<(), JsValue> {
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let mut created = Vec::new();
    for fb in FALLBACKS.iter() {
        if doc.get_element_by_id(fb.id).is_some() {
            continue;
        }
        let host: Element = match fb.parent {
            None => body.clone().into(),
            Some(parent) => match doc.get_element_by_id(parent) {
                Some(el) => el,
                None => {
                    // Only the control bar is created lazily; the modal is in FALLBACKS.
                    body.insert_adjacent_html("beforeend", CONTROLS_HTML)?;
                    by_id(doc, parent)?
                }
            },
        };
        host.insert_adjacent_html("beforeend", fb.html)?;
        created.push(fb.id);
    }
    if !created.is_empty() {
        console_log!("page markup filled in for: {}", created.join(", "));
    }
    Ok(())
}
