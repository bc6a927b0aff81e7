use campus_map_shared::building::NO_IMAGE_SRC;
use campus_map_shared::colors::NEUTRAL_GRADIENT;
use campus_map_shared::{PanelSlot, PanelView};
use leptos::prelude::*;

use crate::session::Session;

#[derive(Clone, Copy)]
pub(crate) struct TextBlock {
    pub visible: RwSignal<bool>,
    pub text: RwSignal<String>,
}

impl TextBlock {
    fn new() -> Self {
        Self {
            visible: RwSignal::new(false),
            text: RwSignal::new(String::new()),
        }
    }
}

/// Reactive view model behind the building info panel.
#[derive(Clone, Copy)]
pub(crate) struct PanelModel {
    pub open: RwSignal<bool>,
    pub trigger_visible: RwSignal<bool>,
    pub title: RwSignal<String>,
    pub address: TextBlock,
    pub address_href: RwSignal<String>,
    pub description: TextBlock,
    pub accessibility: TextBlock,
    pub secondary_info: TextBlock,
    pub image_src: RwSignal<String>,
    pub background: RwSignal<String>,
}

impl PanelModel {
    pub fn new() -> Self {
        Self {
            open: RwSignal::new(false),
            trigger_visible: RwSignal::new(true),
            title: RwSignal::new(String::new()),
            address: TextBlock::new(),
            address_href: RwSignal::new(String::new()),
            description: TextBlock::new(),
            accessibility: TextBlock::new(),
            secondary_info: TextBlock::new(),
            image_src: RwSignal::new(NO_IMAGE_SRC.to_string()),
            background: RwSignal::new(NEUTRAL_GRADIENT.to_string()),
        }
    }

    fn block(&self, slot: PanelSlot) -> Option<TextBlock> {
        match slot {
            PanelSlot::Address => Some(self.address),
            PanelSlot::Description => Some(self.description),
            PanelSlot::Accessibility => Some(self.accessibility),
            PanelSlot::SecondaryInfo => Some(self.secondary_info),
            PanelSlot::Panel | PanelSlot::TriggerButton | PanelSlot::Title => None,
        }
    }
}

impl PanelView for PanelModel {
    fn set_text(&mut self, slot: PanelSlot, text: &str) {
        if slot == PanelSlot::Title {
            self.title.set(text.to_string());
        } else if let Some(block) = self.block(slot) {
            block.text.set(text.to_string());
        }
    }

    fn set_visible(&mut self, slot: PanelSlot, visible: bool) {
        match slot {
            PanelSlot::Panel => self.open.set(visible),
            PanelSlot::TriggerButton => self.trigger_visible.set(visible),
            PanelSlot::Title => {}
            _ => {
                if let Some(block) = self.block(slot) {
                    block.visible.set(visible);
                }
            }
        }
    }

    fn set_link(&mut self, slot: PanelSlot, href: &str) {
        if slot == PanelSlot::Address {
            self.address_href.set(href.to_string());
        }
    }

    fn set_image_source(&mut self, src: &str) {
        self.image_src.set(src.to_string());
    }

    fn set_background(&mut self, css: &str) {
        self.background.set(css.to_string());
    }
}

fn display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

/// Paragraph block that collapses when its text is empty.
#[component]
fn DetailBlock(id: &'static str, heading: &'static str, block: TextBlock) -> impl IntoView {
    view! {
        <div id=id style:display=move || display(block.visible.get()) style="margin-top: 14px;">
            <h3 style="margin: 0 0 4px; font-size: 0.8rem; letter-spacing: 0.06em; text-transform: uppercase; color: #b8b6ae;">
                {heading}
            </h3>
            <p style="margin: 0; line-height: 1.45;">{move || block.text.get()}</p>
        </div>
    }
}

/// Building details panel with photo, text blocks and an exit control.
#[component]
pub fn BuildingPanel() -> impl IntoView {
    let session: Session = expect_context();
    let model = session.view;

    let on_close = move |_: web_sys::MouseEvent| session.close_panel();

    view! {
        <aside
            id="highlightInfo"
            style="position: absolute; top: 0; right: 0; width: 360px; max-width: 100%; height: 100%; overflow-y: auto; color: #f2f0e8; font-family: sans-serif; box-shadow: -4px 0 16px rgba(0,0,0,0.45);"
            style:display=move || display(model.open.get())
            style:background=move || model.background.get()
        >
            <button
                id="exit"
                aria-label="Close"
                style="position: absolute; top: 10px; right: 12px; background: none; border: none; color: #f2f0e8; font-size: 1.4rem; cursor: pointer;"
                on:click=on_close
            >
                "\u{00d7}"
            </button>
            <div class="buildingImg" style="width: 100%; aspect-ratio: 4 / 3; overflow: hidden;">
                <img
                    src=move || model.image_src.get()
                    alt=move || model.title.get()
                    style="width: 100%; height: 100%; object-fit: cover; display: block;"
                />
            </div>
            <div style="padding: 16px 20px 24px;">
                <h2 id="infoTitle" style="margin: 0; font-size: 1.4rem;">
                    {move || model.title.get()}
                </h2>
                <div
                    id="infoAddress"
                    style="margin-top: 10px;"
                    style:display=move || display(model.address.visible.get())
                >
                    <a
                        href=move || model.address_href.get()
                        target="_blank"
                        rel="noopener noreferrer"
                        style="color: #f5b06a;"
                    >
                        {move || model.address.text.get()}
                    </a>
                </div>
                <DetailBlock id="infoInfo" heading="About" block=model.description />
                <DetailBlock id="infoAccessibility" heading="Accessibility" block=model.accessibility />
                <DetailBlock id="infoBrInfo" heading="Restrooms" block=model.secondary_info />
            </div>
        </aside>
    }
}

/// Button that toggles the panel without touching the selection.
#[component]
pub fn InfoButton() -> impl IntoView {
    let session: Session = expect_context();
    let model = session.view;

    view! {
        <button
            id="info-button"
            aria-label="Building info"
            style="position: absolute; top: 14px; right: 14px; width: 40px; height: 40px; border-radius: 50%; border: none; background: #333333; color: #f2f0e8; font-size: 1.2rem; font-weight: bold; cursor: pointer;"
            style:display=move || display(model.trigger_visible.get())
            on:click=move |_| session.toggle_panel()
        >
            "i"
        </button>
    }
}
