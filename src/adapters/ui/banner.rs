//! Startup banner: figlet title shaded one pipeline stage per line, then the stage legend.

use crate::domain::Stage;
use crossterm::style::{Color, Stylize, style};
use figlet_rs::FIGfont;

/// Prompt accent used by the inquire theme (neon purple).
const ACCENT: Color = Color::Rgb {
    r: 0xbc,
    g: 0x13,
    b: 0xfe,
};
/// Highlight used by the inquire theme and the version line (cyber green).
const HIGHLIGHT: Color = Color::Rgb {
    r: 0x0f,
    g: 0xf0,
    b: 0xfc,
};

/// Shade for each stage, cold (new) to hot (closed).
fn stage_color(stage: Stage) -> Color {
    match stage {
        Stage::Novo => ACCENT,
        Stage::Qualificado => Color::Rgb { r: 0x8a, g: 0x4b, b: 0xfd },
        Stage::Contatado => Color::Rgb { r: 0x5a, g: 0x84, b: 0xfc },
        Stage::Proposta => Color::Rgb { r: 0x30, g: 0xba, b: 0xfc },
        Stage::Fechado => HIGHLIGHT,
    }
}

/// Title lines paired with their color. Lines are spread evenly over the stages.
fn banner_lines(title: &str) -> Vec<(String, Color)> {
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(title).map(|figure| figure.to_string()))
        .unwrap_or_else(|| title.to_string());
    let lines: Vec<&str> = art.lines().filter(|l| !l.trim().is_empty()).collect();
    let total = lines.len().max(1);

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let stage = Stage::ALL[i * Stage::ALL.len() / total];
            (line.to_string(), stage_color(stage))
        })
        .collect()
}

/// "Novo Lead > Qualificado > ..." in pipeline order.
fn stage_legend() -> String {
    Stage::ALL
        .iter()
        .map(|s| s.display_name())
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn print_welcome() {
    for (line, color) in banner_lines("LEADS") {
        println!("{}", style(line).with(color));
    }
    println!(
        "{}",
        style(format!("lead-tracker v{}", env!("CARGO_PKG_VERSION"))).with(HIGHLIGHT)
    );
    println!("{}\n", style(stage_legend()).dim());
}
