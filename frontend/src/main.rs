use std::pin::Pin;
use std::rc::Rc;

use shared::config::{EXECUTION_URL_ENV, EXECUTION_URL_STORAGE_KEY};
use shared::{CopyStatus, EndpointConfig, Pane, PlaygroundState};
use zoon::{eprintln, println, *};

mod browser;
mod clipboard;
mod fetch_client;
mod logger;

use browser::{BrowserClock, PANE_ATTRIBUTE};
use clipboard::{NavigatorClipboard, SelectionFallback};
use fetch_client::FetchClient;

const APP_BACKGROUND_GRADIENT: &str = "linear-gradient(135deg, #0f172a 0%, #1e293b 100%)";

type BoolSignal = Pin<Box<dyn Signal<Item = bool>>>;

const EDITOR_HEIGHT_PX: u32 = 384;
const OUTPUT_HEIGHT_PX: u32 = 256;

fn panel_color() -> Rgba {
    color!("#1e293b")
}

fn panel_header_color() -> Rgba {
    color!("#0f172a")
}

fn panel_border_color() -> Rgba {
    color!("#334155")
}

fn primary_text_color() -> Rgba {
    color!("#e2e8f0")
}

fn muted_text_color() -> Rgba {
    color!("#64748b")
}

fn main() {
    logger::init();
    start_app("app", Playground::new);
}

#[derive(Clone)]
struct Playground {
    state: PlaygroundState,
    client: Rc<FetchClient>,
}

impl Playground {
    fn new() -> impl Element {
        let stored_url = match local_storage().get::<String>(EXECUTION_URL_STORAGE_KEY) {
            Some(Ok(url)) => Some(url),
            Some(Err(error)) => {
                eprintln!("Ignoring stored execution URL: {error:#?}");
                None
            }
            None => None,
        };
        let config = EndpointConfig::resolve(stored_url.as_deref(), option_env!("PETTA_EXECUTION_URL"));
        println!("Execution endpoint: {} (override with {EXECUTION_URL_STORAGE_KEY} or {EXECUTION_URL_ENV})", config.url);

        Self {
            state: PlaygroundState::new(),
            client: Rc::new(FetchClient::new(config)),
        }
        .root()
    }

    fn run(&self) {
        match self.state.trigger_run(self.client.as_ref(), BrowserClock) {
            Some(run) => {
                Task::start(run);
            }
            None => println!("Run already in progress against {}", self.client.url()),
        }
    }

    fn copy(&self, pane: Pane) {
        if pane == Pane::Output && !self.state.output_actions_enabled() {
            return;
        }
        let state = self.state.clone();
        Task::start(async move {
            if let Ok(path) = state
                .copy_pane(pane, &NavigatorClipboard, &SelectionFallback, &BrowserClock)
                .await
            {
                println!("Copied {pane} pane ({path:?})");
            }
        });
    }

    fn clear_output(&self) {
        if self.state.output_actions_enabled() {
            self.state.clear_output();
        }
    }

    fn root(&self) -> impl Element + use<> {
        El::new()
            .s(Width::fill())
            .s(Height::fill())
            .s(Scrollbars::both())
            .s(Font::new().color(primary_text_color()))
            .update_raw_el(|raw_el| raw_el.style("background", APP_BACKGROUND_GRADIENT))
            .update_raw_el({
                let this = self.clone();
                move |raw_el| {
                    raw_el.global_event_handler_with_options(
                        EventOptions::new().preventable().parents_first(),
                        move |event: events::KeyDown| {
                            if event.repeat() {
                                return;
                            }
                            if event.shift_key() && event.key() == "Enter" {
                                event.prevent_default();
                                this.run();
                            }
                        },
                    )
                }
            })
            .child(
                Column::new()
                    .s(Width::fill().max(896))
                    .s(Align::new().center_x())
                    .s(Padding::new().x(16).y(32))
                    .s(Gap::new().y(24))
                    .item(self.header())
                    .item(self.editor_panel())
                    .item(El::new().s(Align::new().center_x()).child(self.run_button()))
                    .item(self.output_panel()),
            )
    }

    fn header(&self) -> impl Element + use<> {
        El::new()
            .s(Align::new().center_x())
            .s(Padding::new().bottom(8))
            .s(
                Font::new()
                    .size(36)
                    .weight(FontWeight::Bold)
                    .color(color!("white"))
                    .no_wrap(),
            )
            .child("PeTTa Playground")
    }

    fn panel<H: Element, B: Element>(&self, header: H, body: B) -> impl Element + use<H, B> {
        Column::new()
            .s(Width::fill())
            .s(Background::new().color(panel_color()))
            .s(RoundedCorners::all(12))
            .s(Clip::both())
            .s(Borders::all(Border::new().color(panel_border_color()).width(1)))
            .s(Shadows::new([
                Shadow::new()
                    .color(color!("rgba(0, 0, 0, 0.25)"))
                    .y(10)
                    .blur(15)
                    .spread(-3),
            ]))
            .item(
                Row::new()
                    .s(Width::fill())
                    .s(Align::new().center_y())
                    .s(Padding::new().x(16).y(12))
                    .s(Background::new().color(panel_header_color()))
                    .s(Borders::new().bottom(Border::new().color(panel_border_color()).width(1)))
                    .item(header),
            )
            .item(body)
    }

    fn window_dots<const N: usize>(colors: [Rgba; N]) -> impl Element {
        Row::new()
            .s(Gap::new().x(6))
            .items(colors.map(|color| {
                El::new()
                    .s(Width::exact(12))
                    .s(Height::exact(12))
                    .s(RoundedCorners::all_max())
                    .s(Background::new().color(color))
            }))
    }

    fn panel_title(title: &'static str) -> impl Element {
        El::new()
            .s(Font::new().size(14).weight(FontWeight::SemiBold).color(primary_text_color()))
            .child(title)
    }

    fn editor_panel(&self) -> impl Element + use<> {
        let header = Row::new()
            .s(Width::fill())
            .s(Align::new().center_y())
            .s(Gap::new().x(8))
            .item(Self::window_dots([
                color!("#ef4444"),
                color!("#eab308"),
                color!("#22c55e"),
            ]))
            .item(Self::panel_title("Input"))
            .item(
                Row::new()
                    .s(Align::new().right())
                    .s(Gap::new().x(8))
                    .item(self.copy_button(Pane::Input, "Copy Input"))
                    .item(self.action_button("Clear", Box::pin(signal::always(true)), {
                        let state = self.state.clone();
                        Box::new(move || state.clear_source_text())
                    })),
            );

        let editor = TextArea::new()
            .s(Width::fill())
            .s(Height::exact(EDITOR_HEIGHT_PX))
            .s(Padding::all(16))
            .s(Background::new().color(panel_header_color()))
            .s(Font::new()
                .size(16)
                .color(color!("#f1f5f9"))
                .family([FontFamily::new("JetBrains Mono"), FontFamily::Monospace]))
            .label_hidden("MeTTa code")
            .placeholder(Placeholder::new("Write MeTTa code here..."))
            .text_signal(self.state.source_text_signal())
            .on_change({
                let state = self.state.clone();
                move |text| state.set_source_text(text)
            })
            .update_raw_el(|raw_el| {
                raw_el
                    .attr("spellcheck", "false")
                    .attr(PANE_ATTRIBUTE, Pane::Input.dom_name())
                    .style("resize", "none")
                    .style("outline", "none")
            });

        self.panel(header, editor)
    }

    fn output_panel(&self) -> impl Element + use<> {
        let header = Row::new()
            .s(Width::fill())
            .s(Align::new().center_y())
            .s(Gap::new().x(8))
            .item(Self::window_dots([color!("#22c55e")]))
            .item(Self::panel_title("Output"))
            .item_signal(self.state.last_run_label_signal().map(|label| {
                label.map(|time| {
                    El::new()
                        .s(Padding::new().left(8))
                        .s(Font::new().size(12).color(muted_text_color()))
                        .child(format!("Last run: {time}"))
                })
            }))
            .item_signal(self.state.last_exit_code_signal().map(|exit_code| {
                exit_code.filter(|code| *code != 0).map(|code| {
                    El::new()
                        .s(Padding::new().x(8).y(2))
                        .s(RoundedCorners::all_max())
                        .s(Background::new().color(color!("rgba(239, 68, 68, 0.15)")))
                        .s(Font::new().size(11).weight(FontWeight::SemiBold).color(color!("#fca5a5")))
                        .child(format!("exit {code}"))
                })
            }))
            .item(
                Row::new()
                    .s(Align::new().right())
                    .s(Gap::new().x(8))
                    .item(self.copy_button(Pane::Output, "Copy Output"))
                    .item(self.action_button(
                        "Clear",
                        Box::pin(self.state.output_actions_enabled_signal()),
                        {
                            let this = self.clone();
                            Box::new(move || this.clear_output())
                        },
                    )),
            );

        let output = El::new()
            .s(Width::fill())
            .s(Height::exact(OUTPUT_HEIGHT_PX))
            .s(Scrollbars::both())
            .s(Padding::all(16))
            .s(Background::new().color(panel_header_color()))
            .s(Align::new().top())
            .s(Font::new()
                .size(14)
                .color(color!("#86efac"))
                .family([FontFamily::new("JetBrains Mono"), FontFamily::Monospace]))
            .update_raw_el(|raw_el| {
                raw_el
                    .style("white-space", "pre-wrap")
                    .attr(PANE_ATTRIBUTE, Pane::Output.dom_name())
            })
            .child_signal(self.state.execution_result_signal());

        self.panel(header, output)
    }

    fn run_button(&self) -> impl Element + use<> {
        let hovered = Mutable::new(false);
        let running = self.state.is_running_signal().broadcast();
        Button::new()
            .s(Padding::new().x(32).y(12))
            .s(RoundedCorners::all(8))
            .s(Font::new().size(14).weight(FontWeight::SemiBold).color(color!("white")).no_wrap())
            .s(Shadows::new([
                Shadow::new()
                    .color(color!("rgba(15, 23, 42, 0.35)"))
                    .y(4)
                    .blur(12)
                    .spread(-2),
            ]))
            .s(Background::new().color_signal(map_ref! {
                let hovered = hovered.signal(),
                let running = running.signal() =>
                match (*running, *hovered) {
                    (true, _) => color!("#9ca3af"),
                    (false, true) => color!("#4338ca"),
                    (false, false) => color!("#4f46e5"),
                }
            }))
            .update_raw_el({
                let running = self.state.is_running_signal().broadcast();
                move |raw_el| {
                    raw_el
                        .attr_signal(
                            "aria-disabled",
                            running.signal().map_bool(|| Some("true"), || None),
                        )
                        .style_signal(
                            "cursor",
                            running.signal().map_bool(|| "not-allowed", || "pointer"),
                        )
                }
            })
            .label(
                Row::new()
                    .s(Align::new().center_y())
                    .s(Gap::new().x(8))
                    .item(El::new().child_signal(running.signal().map_bool(|| "◌", || "▶")))
                    .item(El::new().child_signal(
                        running.signal().map_bool(|| "Running...", || "Run Code"),
                    ))
                    .item(
                        El::new()
                            .s(Font::new().size(12).weight(FontWeight::Regular).color(color!("rgba(255, 255, 255, 0.7)")))
                            .child("Shift + Enter"),
                    ),
            )
            .on_hovered_change(move |is_hovered| hovered.set(is_hovered))
            .on_press({
                let this = self.clone();
                move || this.run()
            })
    }

    fn copy_button(&self, pane: Pane, idle_label: &'static str) -> impl Element + use<> {
        let enabled: BoolSignal = match pane {
            Pane::Input => Box::pin(signal::always(true)),
            Pane::Output => Box::pin(self.state.output_actions_enabled_signal()),
        };
        let feedback = self.state.copy_feedback(pane);
        let label = El::new().child_signal(feedback.status_signal().map(move |status| match status {
            CopyStatus::Idle => idle_label,
            CopyStatus::Copied => "Copied!",
            CopyStatus::Failed => "Copy failed",
        }));
        let accent = feedback.status_signal().map(|status| match status {
            CopyStatus::Copied => Some(color!("#86efac")),
            CopyStatus::Failed => Some(color!("#fca5a5")),
            CopyStatus::Idle => None,
        });
        let this = self.clone();
        Self::styled_action_button(label, enabled, Box::pin(accent), move || this.copy(pane))
    }

    fn action_button(
        &self,
        label: &'static str,
        enabled: BoolSignal,
        on_press: Box<dyn FnMut()>,
    ) -> impl Element + use<> {
        Self::styled_action_button(
            El::new().child(label),
            enabled,
            Box::pin(signal::always(None)),
            on_press,
        )
    }

    /// Copy and Clear buttons. Handlers check enablement themselves; the
    /// signal only drives the styling.
    fn styled_action_button<L, P>(
        label: L,
        enabled: BoolSignal,
        accent: Pin<Box<dyn Signal<Item = Option<Rgba>>>>,
        on_press: P,
    ) -> impl Element + use<L, P>
    where
        L: Element + 'static,
        P: FnMut() + 'static,
    {
        let hovered = Mutable::new(false);
        let enabled = enabled.broadcast();
        Button::new()
            .s(Padding::new().x(12).y(6))
            .s(RoundedCorners::all(8))
            .s(Borders::all(Border::new().color(color!("#475569")).width(1)))
            .s(Font::new()
                .size(12)
                .weight(FontWeight::Medium)
                .no_wrap()
                .color_signal(map_ref! {
                    let hovered = hovered.signal(),
                    let enabled = enabled.signal(),
                    let accent = accent =>
                    match (*enabled, *hovered, accent.as_ref()) {
                        (false, _, _) => color!("#94a3b8"),
                        (true, _, Some(accent)) => accent.clone(),
                        (true, true, None) => color!("white"),
                        (true, false, None) => primary_text_color(),
                    }
                }))
            .s(Background::new().color_signal(enabled.signal().map_bool(
                || color!("#334155"),
                panel_color,
            )))
            .update_raw_el({
                let enabled = enabled.signal();
                move |raw_el| {
                    raw_el
                        .attr_signal("aria-disabled", enabled.map_bool(|| None, || Some("true")))
                }
            })
            .update_raw_el({
                let cursor = enabled.signal().map_bool(|| "pointer", || "not-allowed");
                move |raw_el| raw_el.style_signal("cursor", cursor)
            })
            .label(label)
            .on_hovered_change(move |is_hovered| hovered.set(is_hovered))
            .on_press(on_press)
    }
}
