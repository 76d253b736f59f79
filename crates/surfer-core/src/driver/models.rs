//! Catalogue of supported Waveshare panels.
//!
//! Specifiers match the Waveshare driver module names, so existing setups can
//! pass the same `--display` value they already use.

/// Static description of one panel model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSpec {
    /// Model specifier, e.g. `"epd7in5_V2"`.
    pub model: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Native width in pixels (landscape orientation of the controller).
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
}

/// Waveshare 7.5" V2 (800×480). Default panel.
pub const EPD_7IN5_V2: PanelSpec = PanelSpec {
    model: "epd7in5_V2",
    name: "Waveshare 7.5\" V2",
    width: 800,
    height: 480,
};

pub const EPD_7IN5: PanelSpec = PanelSpec {
    model: "epd7in5",
    name: "Waveshare 7.5\"",
    width: 640,
    height: 384,
};

pub const EPD_7IN5_HD: PanelSpec = PanelSpec {
    model: "epd7in5_HD",
    name: "Waveshare 7.5\" HD",
    width: 880,
    height: 528,
};

pub const EPD_4IN2: PanelSpec = PanelSpec {
    model: "epd4in2",
    name: "Waveshare 4.2\"",
    width: 400,
    height: 300,
};

pub const EPD_2IN9_V2: PanelSpec = PanelSpec {
    model: "epd2in9_V2",
    name: "Waveshare 2.9\" V2",
    width: 128,
    height: 296,
};

pub const EPD_2IN7: PanelSpec = PanelSpec {
    model: "epd2in7",
    name: "Waveshare 2.7\"",
    width: 176,
    height: 264,
};

pub const EPD_2IN13_V2: PanelSpec = PanelSpec {
    model: "epd2in13_V2",
    name: "Waveshare 2.13\" V2",
    width: 122,
    height: 250,
};

pub const EPD_1IN54_V2: PanelSpec = PanelSpec {
    model: "epd1in54_V2",
    name: "Waveshare 1.54\" V2",
    width: 200,
    height: 200,
};

/// All supported panels.
pub const PANELS: &[PanelSpec] = &[
    EPD_7IN5_V2,
    EPD_7IN5,
    EPD_7IN5_HD,
    EPD_4IN2,
    EPD_2IN9_V2,
    EPD_2IN7,
    EPD_2IN13_V2,
    EPD_1IN54_V2,
];

/// Look up a panel by its exact specifier.
pub fn find(model: &str) -> Option<&'static PanelSpec> {
    PANELS.iter().find(|spec| spec.model == model)
}

/// Comma-separated list of specifiers, for error messages.
pub fn supported_models_string() -> String {
    PANELS
        .iter()
        .map(|spec| spec.model)
        .collect::<Vec<_>>()
        .join(", ")
}
