//! First-run prompt offering low-spec mode.
//!
//! The answer is the exit status: 0 ignore, 1 apply, 2 no decision. Applying
//! the mode is left to the caller.
use gtk::glib;
use gtk4 as gtk;
use libadwaita::{self as adw, Application, prelude::*};
use praya_core::LowspecDecision;
use praya_core::lowspec::{RESPONSE_APPLY, RESPONSE_CLOSE, RESPONSE_IGNORE};
use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;

const APP_ID: &str = "id.blankonlinux.praya.lowspec";
const APP_NAME: &str = "Prihatin";
// 60pt in Pango units.
const HEADING: &str = "<span size=\"61440\">\u{1F422}</span>";
const BODY: &str = "Not all hardware is the same, and that's okay. \
    If your device needs a little help, just switch off some features to get \
    better performance. You can tweak this later in Praya Preferences.";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = adw::init() {
        log::error!("failed to initialize libadwaita: {err}");
        return ExitCode::from(LowspecDecision::Undecided.exit_code());
    }

    let decision = Rc::new(Cell::new(LowspecDecision::default()));
    let app = Application::builder().application_id(APP_ID).build();

    let shared = Rc::clone(&decision);
    app.connect_activate(move |app| present_dialog(app, Rc::clone(&shared)));
    app.run_with_args::<&str>(&[]);

    let decision = decision.get();
    log::debug!("low-spec decision: {decision:?}");
    ExitCode::from(decision.exit_code())
}

fn present_dialog(app: &Application, decision: Rc<Cell<LowspecDecision>>) {
    glib::set_prgname(Some(APP_NAME));
    glib::set_application_name(APP_NAME);

    // Invisible parent so the dialog is centred and has a transient owner.
    let parent = adw::ApplicationWindow::builder()
        .application(app)
        .title(APP_NAME)
        .default_width(1)
        .default_height(1)
        .build();
    parent.present();

    let dialog = adw::MessageDialog::builder()
        .transient_for(&parent)
        .modal(true)
        .heading(HEADING)
        .heading_use_markup(true)
        .body(BODY)
        .close_response(RESPONSE_CLOSE)
        .build();
    dialog.add_response(RESPONSE_IGNORE, "Ignore");
    dialog.add_response(RESPONSE_APPLY, "Disable a few features");
    dialog.set_response_appearance(RESPONSE_APPLY, adw::ResponseAppearance::Suggested);

    let app = app.clone();
    dialog.connect_response(None, move |_, response| {
        decision.set(LowspecDecision::from_response(response));
        app.quit();
    });
    dialog.present();
}
