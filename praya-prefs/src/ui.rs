use crate::formatting::{
    CHECKING_LABEL, StatusLevel, posture_label, service_status_label, service_status_level,
    service_status_tooltip,
};
use gtk::{cairo, gdk};
use gtk4 as gtk;
use libadwaita::{self as adw, prelude::*};
use praya_core::{
    ChatbotConfig, HoverTarget, MenuLayout, PROVIDERS, PostureReading, ServiceStatus,
    ServicesConfig, VERSION,
};
use std::f64::consts::PI;

const AUTHOR: &str = "Herpiko Dwi Aguno &lt;herpiko@gmail.com&gt;";
const LICENSE: &str = "MIT";

pub struct PreferencesWidgets {
    pub window: adw::PreferencesWindow,
    pub layout_row: adw::ComboRow,
    pub position_row: adw::ComboRow,
    pub floating_row: adw::SwitchRow,
    pub hover_rows: Vec<(HoverTarget, adw::SwitchRow)>,
    pub lowspec_row: adw::SwitchRow,
    pub refresh_button: gtk::Button,
    pub posture_row: adw::SwitchRow,
    pub recalibrate_button: gtk::Button,
    pub ai_row: adw::SwitchRow,
    pub provider_row: adw::ComboRow,
    pub model_row: adw::ComboRow,
    pub api_key_row: adw::PasswordEntryRow,
    service_label: gtk::Label,
    service_indicator: gtk::DrawingArea,
    posture_label: gtk::Label,
    posture_level: gtk::LevelBar,
}

fn configure_indicator(indicator: &gtk::DrawingArea, level: StatusLevel) {
    let color = status_indicator_color(level);
    let (r, g, b, a) = (color.red(), color.green(), color.blue(), color.alpha());
    indicator.set_draw_func(move |_, ctx, width, height| {
        ctx.set_antialias(cairo::Antialias::Best);
        ctx.set_source_rgba(r.into(), g.into(), b.into(), a.into());
        let size = width.min(height) as f64;
        let radius = (size / 2.0).max(1.0) - 1.0;
        ctx.arc(
            f64::from(width) / 2.0,
            f64::from(height) / 2.0,
            radius,
            0.0,
            2.0 * PI,
        );
        let _ = ctx.fill();
    });
    indicator.queue_draw();
}

fn status_indicator_color(level: StatusLevel) -> gdk::RGBA {
    match level {
        StatusLevel::Good => gdk::RGBA::new(0.18, 0.74, 0.33, 1.0),
        StatusLevel::Warning => gdk::RGBA::new(0.98, 0.73, 0.22, 1.0),
        StatusLevel::Critical => gdk::RGBA::new(0.86, 0.26, 0.24, 1.0),
        StatusLevel::Neutral => gdk::RGBA::new(0.58, 0.6, 0.65, 1.0),
    }
}

fn suffix_label(text: &str) -> gtk::Label {
    gtk::Label::builder()
        .label(text)
        .valign(gtk::Align::Center)
        .build()
}

fn switch_row(title: &str, active: bool) -> adw::SwitchRow {
    adw::SwitchRow::builder().title(title).active(active).build()
}

fn combo_row(title: &str, items: &[&str], selected: u32) -> adw::ComboRow {
    adw::ComboRow::builder()
        .title(title)
        .model(&gtk::StringList::new(items))
        .selected(selected)
        .build()
}

impl PreferencesWidgets {
    pub fn new(
        app: &adw::Application,
        services: &ServicesConfig,
        chatbot: &ChatbotConfig,
        models: (&[&str], usize),
    ) -> Self {
        let window = adw::PreferencesWindow::builder()
            .application(app)
            .title("Praya Preferences")
            .default_width(520)
            .default_height(680)
            .search_enabled(false)
            .build();

        // Panel
        let panel_page = adw::PreferencesPage::builder()
            .title("Panel")
            .icon_name("view-grid-symbolic")
            .build();

        let panel_group = adw::PreferencesGroup::builder()
            .title("Panel Options")
            .build();
        let layout_row = combo_row(
            "App menu layout",
            &["Grid", "List"],
            services.menu_layout().index(),
        );
        let position_row = combo_row(
            "Position",
            &["Top", "Bottom"],
            services.panel_position().index(),
        );
        let floating_row = switch_row("Floating panel", services.floating_panel());
        panel_group.add(&layout_row);
        panel_group.add(&position_row);
        panel_group.add(&floating_row);
        panel_page.add(&panel_group);

        let hover_group = adw::PreferencesGroup::builder()
            .title("Activate on Hover")
            .build();
        let hover_rows = HoverTarget::ALL
            .into_iter()
            .map(|target| {
                let row = switch_row(target.title(), services.hover(target));
                hover_group.add(&row);
                (target, row)
            })
            .collect::<Vec<_>>();
        panel_page.add(&hover_group);

        let performance_group = adw::PreferencesGroup::builder()
            .title("Performance")
            .build();
        let lowspec_row = switch_row("Low-spec Mode", services.lowspec_enabled());
        performance_group.add(&lowspec_row);
        panel_page.add(&performance_group);
        window.add(&panel_page);

        // Services
        let services_page = adw::PreferencesPage::builder()
            .title("Services")
            .icon_name("preferences-system-symbolic")
            .build();

        let service_group = adw::PreferencesGroup::builder()
            .title("Praya Service")
            .build();
        let service_row = adw::ActionRow::builder().title("Status").build();
        let service_indicator = gtk::DrawingArea::builder()
            .content_width(14)
            .content_height(14)
            .valign(gtk::Align::Center)
            .build();
        configure_indicator(&service_indicator, StatusLevel::Neutral);
        let service_label = suffix_label(CHECKING_LABEL);
        let refresh_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .valign(gtk::Align::Center)
            .tooltip_text("Check again")
            .build();
        service_row.add_suffix(&service_indicator);
        service_row.add_suffix(&service_label);
        service_row.add_suffix(&refresh_button);
        service_group.add(&service_row);
        services_page.add(&service_group);

        let posture_group = adw::PreferencesGroup::builder()
            .title("Posture Monitoring")
            .description("(Experimental)")
            .build();
        let posture_row = switch_row("Enable", services.posture());
        posture_group.add(&posture_row);

        let calibration_row = adw::ActionRow::builder().title("Calibration").build();
        let recalibrate_button = gtk::Button::builder()
            .label("Recalibrate")
            .valign(gtk::Align::Center)
            .build();
        calibration_row.add_suffix(&recalibrate_button);
        posture_group.add(&calibration_row);

        let current_row = adw::ActionRow::builder().title("Current").build();
        let waiting = posture_label(&PostureReading::Waiting);
        let posture_label = suffix_label(&waiting);
        current_row.add_suffix(&posture_label);
        posture_group.add(&current_row);

        let level_row = adw::ActionRow::builder().title("Level").build();
        let posture_level = gtk::LevelBar::builder()
            .min_value(0.0)
            .max_value(1.0)
            .value(0.0)
            .valign(gtk::Align::Center)
            .hexpand(true)
            .width_request(150)
            .build();
        level_row.add_suffix(&posture_level);
        posture_group.add(&level_row);
        services_page.add(&posture_group);

        let ai_group = adw::PreferencesGroup::builder()
            .title("Artificial Intelligence")
            .description("(Experimental)")
            .build();
        let ai_row = switch_row("Enable", services.ai());
        let provider_names = PROVIDERS.iter().map(|p| p.name).collect::<Vec<_>>();
        let provider_row = combo_row(
            "Provider",
            &provider_names,
            chatbot.provider().index() as u32,
        );
        let (model_names, selected_model) = models;
        let model_row = combo_row("Model", model_names, selected_model as u32);
        let api_key_row = adw::PasswordEntryRow::builder().title("API Key").build();
        api_key_row.set_text(chatbot.api_key());
        ai_group.add(&ai_row);
        ai_group.add(&provider_row);
        ai_group.add(&model_row);
        ai_group.add(&api_key_row);
        services_page.add(&ai_group);
        window.add(&services_page);

        // About
        let about_page = adw::PreferencesPage::builder()
            .title("About Praya")
            .icon_name("help-about-symbolic")
            .build();
        let about_group = adw::PreferencesGroup::new();
        let version_row = adw::ActionRow::builder().title("Version").build();
        version_row.add_suffix(&suffix_label(VERSION));
        about_group.add(&version_row);
        about_group.add(
            &adw::ActionRow::builder()
                .title("Author")
                .subtitle(AUTHOR)
                .build(),
        );
        about_group.add(
            &adw::ActionRow::builder()
                .title("License")
                .subtitle(LICENSE)
                .build(),
        );
        about_page.add(&about_group);
        window.add(&about_page);

        PreferencesWidgets {
            window,
            layout_row,
            position_row,
            floating_row,
            hover_rows,
            lowspec_row,
            refresh_button,
            posture_row,
            recalibrate_button,
            ai_row,
            provider_row,
            model_row,
            api_key_row,
            service_label,
            service_indicator,
            posture_label,
            posture_level,
        }
    }

    pub fn set_menu_layout(&self, layout: MenuLayout) {
        self.layout_row.set_selected(layout.index());
    }

    pub fn set_models(&self, models: &[&str], selected: usize) {
        self.model_row
            .set_model(Some(&gtk::StringList::new(models)));
        self.model_row.set_selected(selected as u32);
    }

    pub fn show_service_checking(&self) {
        self.service_label.set_label(CHECKING_LABEL);
        self.service_label.set_tooltip_text(None);
        self.refresh_button.set_sensitive(false);
    }

    pub fn show_service_status(&self, status: &ServiceStatus) {
        self.service_label.set_label(&service_status_label(status));
        self.service_label
            .set_tooltip_text(service_status_tooltip(status).as_deref());
        configure_indicator(&self.service_indicator, service_status_level(status));
        self.refresh_button.set_sensitive(true);
    }

    pub fn show_posture(&self, reading: &PostureReading) {
        self.posture_label.set_label(&posture_label(reading));
        self.posture_level.set_value(reading.gauge());
    }

    pub fn show_error(&self, message: &str) {
        let toast = adw::Toast::builder().title(message).timeout(4).build();
        self.window.add_toast(toast);
    }
}
