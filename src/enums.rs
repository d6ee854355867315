use crate::habits::render::Style;

use clap::ValueEnum;
use std::io::IsTerminal;

#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ColorWhen {
    Always,
    #[default]
    Auto,
    Never,
}

impl ColorWhen {
    pub fn style(self) -> Style {
        self.style_for(std::io::stdout().is_terminal())
    }

    pub fn style_for(self, is_terminal: bool) -> Style {
        let color = match self {
            ColorWhen::Always => true,
            ColorWhen::Never => false,
            ColorWhen::Auto => is_terminal,
        };
        Style { color }
    }
}

impl std::fmt::Display for ColorWhen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}
