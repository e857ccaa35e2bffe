use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::wheel::{self, Item, WheelState};
use crate::render;
use crate::sys::runtime;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use wordmath::{Word, WordVectors, analogy};

pub struct AppModel {
    pub wheel: Rc<RefCell<WheelState>>,
    pub vectors: Option<Arc<WordVectors>>,
    pub config: Config,
    pub events_tx: async_channel::Sender<AppEvent>,
    tick_source: Option<glib::SourceId>,
    drawing_area: gtk::DrawingArea,
    entry: gtk::Entry,
    status: gtk::Label,
}

#[derive(Debug)]
pub enum AppMsg {
    Submit,
    WheelPress(f64),
    WheelDrag(f64),
    WheelRelease,
    Tick,
    VectorsLoaded(Arc<WordVectors>),
    VectorsFailed(String),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::VectorsLoaded(v) => AppMsg::VectorsLoaded(v),
            AppEvent::VectorsFailed(reason) => AppMsg::VectorsFailed(reason),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        async_channel::Sender<AppEvent>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Wordwheel"),
            set_default_size: (540, 480),
            add_css_class: "wordwheel-window",

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 12,
                set_margin_all: 16,

                gtk::Label {
                    set_label: "Enter words and operations, separated by spaces (e.g. 'king - man + woman'):",
                    set_wrap: true,
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 8,

                    #[name = "entry"]
                    gtk::Entry {
                        set_placeholder_text: Some("king - man + woman"),
                        set_hexpand: true,
                        connect_activate[sender] => move |_| {
                            sender.input(AppMsg::Submit);
                        },
                    },

                    gtk::Button {
                        set_label: "Find Similar Words",
                        connect_clicked[sender] => move |_| {
                            sender.input(AppMsg::Submit);
                        },
                    },
                },

                #[name = "status"]
                gtk::Label {
                    set_label: "Loading word vectors…",
                    add_css_class: "wordwheel-status",
                },

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    set_content_height: 260,
                    add_css_class: "wordwheel-canvas",

                    add_controller = gtk::GestureDrag {
                        connect_drag_begin[sender] => move |_, x, _| {
                            sender.input(AppMsg::WheelPress(x));
                        },
                        connect_drag_update[sender] => move |gesture, dx, _| {
                            if let Some((start_x, _)) = gesture.start_point() {
                                sender.input(AppMsg::WheelDrag(start_x + dx));
                            }
                        },
                        connect_drag_end[sender] => move |_, _, _| {
                            sender.input(AppMsg::WheelRelease);
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, events_tx, rx) = init;

        theme::load_css();

        let wheel = Rc::new(RefCell::new(WheelState::new()));

        let model = AppModel {
            wheel: wheel.clone(),
            vectors: None,
            config,
            events_tx,
            tick_source: None,
            drawing_area: gtk::DrawingArea::default(),
            entry: gtk::Entry::default(),
            status: gtk::Label::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.entry = widgets.entry.clone();
        model.status = widgets.status.clone();

        let wheel_draw = wheel.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                if let Err(e) = wheel::draw(
                    cr,
                    &mut wheel_draw.borrow_mut(),
                    width as f64,
                    height as f64,
                    &colors,
                ) {
                    log::error!("wheel drawing error: {e}");
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Submit => self.run_query(),
            AppMsg::WheelPress(x) => {
                // a new drag always wins over a coast/snap in flight
                self.cancel_tick();
                self.wheel.borrow_mut().press(x);
            }
            AppMsg::WheelDrag(x) => {
                if self.wheel.borrow_mut().drag_to(x) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::WheelRelease => {
                if self.wheel.borrow_mut().release() {
                    self.ensure_tick(&sender);
                }
            }
            AppMsg::Tick => {
                let step = self.wheel.borrow_mut().tick();
                if step.redraw {
                    self.drawing_area.queue_draw();
                }
                if !step.running {
                    self.cancel_tick();
                }
            }
            AppMsg::VectorsLoaded(vectors) => {
                self.set_status(
                    &format!(
                        "{} word vectors loaded ({} dimensions).",
                        vectors.len(),
                        vectors.dimensionality()
                    ),
                    false,
                );
                self.vectors = Some(vectors);
            }
            AppMsg::VectorsFailed(reason) => {
                log::error!("failed to load embeddings: {reason}");
                let demo = Arc::new(WordVectors::demo());
                self.set_status(
                    &format!(
                        "Embeddings unavailable, using the built-in demo set ({} words).",
                        demo.len()
                    ),
                    true,
                );
                self.vectors = Some(demo);
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    if new_config.embeddings != self.config.embeddings {
                        runtime::load_vectors_in_background(
                            new_config.embeddings.clone(),
                            self.events_tx.clone(),
                        );
                    }
                    self.config = new_config;
                    log::info!("configuration reloaded");
                }
                Err(e) => log::error!("failed to reload config: {e}"),
            },
        }
    }
}

impl AppModel {
    fn run_query(&mut self) {
        let text = self.entry.text();
        let input = text.trim();
        if input.is_empty() {
            self.set_status("Please enter an expression first.", true);
            return;
        }
        let Some(vectors) = self.vectors.clone() else {
            self.set_status("Word vectors are still loading…", true);
            return;
        };

        let analogy = match analogy::parse(input) {
            Ok(a) => a,
            Err(e) => {
                self.set_status(&format!("Invalid expression: {e}."), true);
                return;
            }
        };

        // request extra results so filtering the operands back out still
        // leaves a full wheel
        let ranked = match vectors.most_similar(
            &analogy.positives,
            &analogy.negatives,
            self.config.top_n + analogy.operand_count(),
        ) {
            Ok(r) => r,
            Err(e) => {
                self.set_status(&format!("Lookup failed: {e}."), true);
                return;
            }
        };
        let neighbors: Vec<(Word, f32)> = ranked
            .into_iter()
            .filter(|(word, _)| !analogy.is_operand(word))
            .take(self.config.top_n)
            .collect();
        if neighbors.is_empty() {
            self.set_status("No neighboring words found.", true);
            return;
        }

        let items: Vec<Item> = neighbors
            .iter()
            .map(|(word, score)| Item::new(word.to_string(), round_percent(*score)))
            .collect();

        self.cancel_tick();
        self.wheel.borrow_mut().set_items(items);
        self.drawing_area.queue_draw();
        self.set_status(
            &format!(
                "Top {} similar words. Drag the wheel to pick one.",
                neighbors.len()
            ),
            false,
        );

        render::launch(&self.config.renderer, &analogy, &vectors, &neighbors);
    }

    fn ensure_tick(&mut self, sender: &ComponentSender<Self>) {
        if self.tick_source.is_some() {
            return;
        }
        let sender = sender.clone();
        self.tick_source = Some(glib::timeout_add_local(wheel::TICK_INTERVAL, move || {
            sender.input(AppMsg::Tick);
            glib::ControlFlow::Continue
        }));
    }

    fn cancel_tick(&mut self) {
        if let Some(source) = self.tick_source.take() {
            source.remove();
        }
    }

    fn set_status(&self, message: &str, is_error: bool) {
        self.status.set_text(message);
        if is_error {
            self.status.add_css_class("error");
        } else {
            self.status.remove_css_class("error");
        }
    }
}

fn round_percent(score: f32) -> f64 {
    (f64::from(score) * 10_000.0).round() / 100.0
}
