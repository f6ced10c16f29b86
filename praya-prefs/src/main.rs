mod actions;
mod desktop;
mod formatting;
mod ui;

use actions::ExternalActions;
use clap::Parser;
use desktop::GioDesktopSettings;
use gtk::glib;
use gtk4 as gtk;
use libadwaita::{self as adw, Application, prelude::*};
use praya_core::posture::{MAX_POLL_PERIOD, MIN_POLL_PERIOD};
use praya_core::status::{DEFAULT_SERVICE_UNIT, PROBE_TIMEOUT};
use praya_core::{
    ConfigPaths, Effect, MenuLayout, PanelPosition, PollTimer, PostureTiming, PostureTracker,
    PreferenceEvent, PreferencesController, ServiceProbe, TimerHandle,
};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

const APP_ID: &str = "id.blankonlinux.praya.preferences";

#[derive(Parser, Debug)]
#[command(author, version, about = "Preferences for the Praya shell extension", long_about = None)]
struct Cli {
    /// Directory holding services.json and chatbot.json.
    #[arg(long, env = "PRAYA_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
    /// systemd user unit whose status is shown.
    #[arg(long, default_value = DEFAULT_SERVICE_UNIT, value_parser = parse_service)]
    service: ServiceProbe,
    /// How long to wait for systemctl before reporting an error.
    #[arg(long, value_parser = humantime::parse_duration)]
    status_timeout: Option<Duration>,
    /// How often to ask the daemon for the current posture.
    #[arg(long, default_value = "200ms", value_parser = parse_poll_interval)]
    poll_interval: PostureTiming,
}

fn parse_service(value: &str) -> Result<ServiceProbe, String> {
    ServiceProbe::new(value).map_err(|err| err.to_string())
}

fn parse_poll_interval(value: &str) -> Result<PostureTiming, String> {
    let period = humantime::parse_duration(value).map_err(|err| err.to_string())?;
    PostureTiming::from_period(period).ok_or_else(|| {
        format!(
            "poll interval must be between {} and {}",
            humantime::format_duration(MIN_POLL_PERIOD),
            humantime::format_duration(MAX_POLL_PERIOD)
        )
    })
}

struct Options {
    paths: ConfigPaths,
    probe: ServiceProbe,
    timing: PostureTiming,
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        let dir = cli
            .config_dir
            .unwrap_or_else(|| glib::user_config_dir().join("praya"));
        Options {
            paths: ConfigPaths::new(dir),
            probe: cli
                .service
                .with_timeout(cli.status_timeout.unwrap_or(PROBE_TIMEOUT)),
            timing: cli.poll_interval,
        }
    }
}

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let options = Rc::new(Options::from(Cli::parse()));
    adw::init().expect("Failed to initialize libadwaita");

    let app = Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }
        let controller = AppController::new(app, &options);
        controller.start();
    });

    // Arguments were consumed by clap; GApplication gets none.
    app.run_with_args::<&str>(&[])
}

struct PollSource(glib::SourceId);

impl TimerHandle for PollSource {
    fn cancel(self) {
        self.0.remove();
    }
}

struct AppController {
    prefs: RefCell<PreferencesController<GioDesktopSettings>>,
    actions: ExternalActions,
    widgets: ui::PreferencesWidgets,
    posture: RefCell<PostureTracker>,
    poll_timer: RefCell<PollTimer<PollSource>>,
    timing: PostureTiming,
    syncing: Cell<bool>,
}

impl AppController {
    fn new(app: &Application, options: &Options) -> Rc<Self> {
        log::debug!("using config directory {}", options.paths.dir().display());
        let actions = ExternalActions::connect(options.probe.clone());
        let mut prefs = PreferencesController::load(&options.paths, GioDesktopSettings);
        prefs.set_bus_available(actions.bus_available());

        let widgets = ui::PreferencesWidgets::new(
            app,
            prefs.services(),
            prefs.chatbot(),
            prefs.model_choices(),
        );
        let controller = Rc::new(Self {
            prefs: RefCell::new(prefs),
            actions,
            widgets,
            posture: RefCell::new(PostureTracker::default()),
            poll_timer: RefCell::new(PollTimer::default()),
            timing: options.timing,
            syncing: Cell::new(false),
        });
        controller.setup_handlers();
        controller
    }

    fn start(self: &Rc<Self>) {
        self.refresh_service_status();
        self.start_posture_polling();
        self.widgets.window.present();
    }

    fn setup_handlers(self: &Rc<Self>) {
        let widgets = &self.widgets;

        let controller = Rc::clone(self);
        widgets.layout_row.connect_selected_notify(move |row| {
            controller.dispatch(PreferenceEvent::MenuLayout(MenuLayout::from_index(
                row.selected(),
            )));
        });

        let controller = Rc::clone(self);
        widgets.position_row.connect_selected_notify(move |row| {
            controller.dispatch(PreferenceEvent::PanelPosition(PanelPosition::from_index(
                row.selected(),
            )));
        });

        let controller = Rc::clone(self);
        widgets.floating_row.connect_active_notify(move |row| {
            controller.dispatch(PreferenceEvent::FloatingPanel(row.is_active()));
        });

        for (target, row) in &widgets.hover_rows {
            let controller = Rc::clone(self);
            let target = *target;
            row.connect_active_notify(move |row| {
                controller.dispatch(PreferenceEvent::Hover(target, row.is_active()));
            });
        }

        let controller = Rc::clone(self);
        widgets.lowspec_row.connect_active_notify(move |row| {
            controller.dispatch(PreferenceEvent::Lowspec(row.is_active()));
        });

        let controller = Rc::clone(self);
        widgets.posture_row.connect_active_notify(move |row| {
            controller.dispatch(PreferenceEvent::Posture(row.is_active()));
        });

        let controller = Rc::clone(self);
        widgets.ai_row.connect_active_notify(move |row| {
            controller.dispatch(PreferenceEvent::Ai(row.is_active()));
        });

        let controller = Rc::clone(self);
        widgets.provider_row.connect_selected_notify(move |row| {
            controller.dispatch(PreferenceEvent::Provider(row.selected() as usize));
        });

        let controller = Rc::clone(self);
        widgets.model_row.connect_selected_notify(move |row| {
            controller.dispatch(PreferenceEvent::Model(row.selected() as usize));
        });

        let controller = Rc::clone(self);
        widgets.api_key_row.connect_changed(move |row| {
            controller.dispatch(PreferenceEvent::ApiKey(row.text().to_string()));
        });

        let controller = Rc::clone(self);
        widgets
            .refresh_button
            .connect_clicked(move |_| controller.refresh_service_status());

        let controller = Rc::clone(self);
        widgets
            .recalibrate_button
            .connect_clicked(move |_| controller.actions.recalibrate());

        let controller = Rc::clone(self);
        widgets.window.connect_close_request(move |_| {
            controller.shutdown();
            glib::Propagation::Proceed
        });
    }

    fn dispatch(self: &Rc<Self>, event: PreferenceEvent) {
        // Programmatic widget updates below re-emit notify signals.
        if self.syncing.get() {
            return;
        }
        let outcome = self.prefs.borrow_mut().handle(event);
        if let Err(err) = &outcome.saved {
            self.widgets
                .show_error(&format!("Could not save preferences: {err}"));
        }
        for effect in outcome.effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&self, effect: Effect) {
        match effect {
            Effect::ShowMenuLayout(layout) => {
                self.while_syncing(|| self.widgets.set_menu_layout(layout));
            }
            Effect::ShowModels { models, selected } => {
                self.while_syncing(|| self.widgets.set_models(models, selected));
            }
            Effect::SetFeature { feature, enabled } => self.actions.set_feature(feature, enabled),
        }
    }

    fn while_syncing(&self, update: impl FnOnce()) {
        self.syncing.set(true);
        update();
        self.syncing.set(false);
    }

    fn refresh_service_status(self: &Rc<Self>) {
        self.widgets.show_service_checking();
        let controller = Rc::clone(self);
        glib::MainContext::default().spawn_local(async move {
            let status = controller.actions.service_status().await;
            controller.widgets.show_service_status(&status);
            controller.prefs.borrow_mut().set_service_status(status);
        });
    }

    fn start_posture_polling(self: &Rc<Self>) {
        let controller = Rc::clone(self);
        let source = glib::timeout_add_local(self.timing.period(), move || {
            controller.poll_posture();
            glib::ControlFlow::Continue
        });
        self.poll_timer.borrow_mut().start(PollSource(source));
    }

    fn poll_posture(self: &Rc<Self>) {
        if !self.posture.borrow_mut().try_begin() {
            log::trace!("previous posture call still pending, skipping tick");
            return;
        }
        let controller = Rc::clone(self);
        glib::MainContext::default().spawn_local(async move {
            let result = controller
                .actions
                .fetch_posture(controller.timing.call_timeout())
                .await;
            let reading = controller.posture.borrow_mut().complete(result).clone();
            controller.widgets.show_posture(&reading);
        });
    }

    fn shutdown(&self) {
        if self.poll_timer.borrow_mut().stop() {
            log::debug!("posture polling stopped");
        }
    }
}
