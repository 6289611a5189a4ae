use crate::engine::Engine;
use crate::events::{AppEvent, WheelEvent};
use crate::gui::assets::Assets;
use crate::gui::sound::Sounds;
use crate::gui::{theme, view, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::source::{SourceError, Table};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub engine: Rc<RefCell<Engine>>,
    pub sounds: Sounds,
    pub fetch_tx: async_channel::Sender<()>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Frame,
    Fetched(Result<Table, SourceError>),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Fetched(result) => AppMsg::Fetched(result),
        }
    }
}

impl AppModel {
    fn handle(&mut self, event: WheelEvent) {
        match event {
            WheelEvent::Tick => self.sounds.tick(),
            WheelEvent::SpinStarted => {}
            WheelEvent::Finished(_) => self.sounds.finished(),
            WheelEvent::ImportRequested => {
                if let Err(e) = self.fetch_tx.try_send(()) {
                    log::error!("Fetch service unavailable: {}", e);
                    self.import(Err(SourceError::Io(std::io::Error::other(e.to_string()))));
                }
            }
        }
    }

    fn import(&mut self, fetched: Result<Table, SourceError>) {
        match self.engine.borrow_mut().complete_import(fetched) {
            Ok(()) => log::info!("Wheel reloaded"),
            Err(e) => log::error!("Import failed, keeping current wheel: {}", e),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Engine,
        async_channel::Sender<()>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Sorcle"),
            set_default_size: (WINDOW_WIDTH, WINDOW_HEIGHT),
            set_resizable: false,
            add_css_class: "sorcle-window",

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_content_width: WINDOW_WIDTH,
                set_content_height: WINDOW_HEIGHT,
                add_css_class: "sorcle-drawing-area",
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (engine, fetch_tx, rx) = init;

        theme::load_css();

        let assets = Assets::load(engine.config());
        let sounds = Sounds::from_config(engine.config());
        let engine = Rc::new(RefCell::new(engine));

        let model = AppModel {
            engine: engine.clone(),
            sounds,
            fetch_tx,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        widgets.drawing_area.set_draw_func(move |_, cr, _, _| {
            if let Err(e) = view::draw(cr, &engine.borrow(), &assets) {
                log::error!("Drawing error: {}", e);
            }
        });

        let frame_sender = sender.clone();
        widgets.drawing_area.add_tick_callback(move |_, _| {
            frame_sender.input(AppMsg::Frame);
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Frame => {
                let events = self.engine.borrow_mut().frame();
                for event in events {
                    self.handle(event);
                }
            }
            AppMsg::Fetched(result) => self.import(result),
        }
        self.drawing_area.queue_draw();
    }
}
