//! UI Strings
//!
//! Two fixed dictionaries. The rest of the surface only reads from
//! [`Strings`]; adding a language means adding one more table.

use lexiguard_core::Indicator;

/// Supported interface languages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Spanish
    Es,
}

impl Locale {
    /// Parse a locale code, falling back to English
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        match code.split(['-', '_']).next() {
            Some("es") => Self::Es,
            _ => Self::En,
        }
    }

    /// Short code ("en", "es")
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// The other language
    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Es,
            Self::Es => Self::En,
        }
    }

    /// String table for this locale
    pub fn strings(self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Es => &ES,
        }
    }
}

/// One language's worth of UI text
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub input_label: &'static str,
    pub placeholder: &'static str,
    pub model_label: &'static str,
    pub samples_label: &'static str,
    pub result_label: &'static str,
    pub result_placeholder: &'static str,
    pub analyzing: &'static str,
    pub verdict_spam: &'static str,
    pub verdict_not_spam: &'static str,
    pub error_message: &'static str,
    pub model_used: &'static str,
    pub why_flagged: &'static str,
    pub no_indicators: &'static str,
    pub help: &'static str,
    /// Explanations in `Indicator::ALL` order
    indicators: [&'static str; 8],
}

impl Strings {
    /// Explanation for one indicator
    pub fn indicator(&self, indicator: Indicator) -> &'static str {
        let index = Indicator::ALL
            .iter()
            .position(|i| *i == indicator)
            .unwrap_or_default();
        self.indicators[index]
    }
}

pub static EN: Strings = Strings {
    title: "LexiGuard",
    subtitle: "Spam message checker",
    input_label: "Message",
    placeholder: "Enter text here...",
    model_label: "Model",
    samples_label: "Examples",
    result_label: "Result",
    result_placeholder: "Type or pick a message, then press Enter to check it.",
    analyzing: "Analyzing...",
    verdict_spam: "Spam ❌",
    verdict_not_spam: "Not Spam ✔",
    error_message: "Error contacting server. Please try again.",
    model_used: "Model used",
    why_flagged: "Why this looks like spam",
    no_indicators: "No common spam patterns found in the text.",
    help: "Enter check · Tab focus · ↑↓ choose · Ctrl+R random · F2 language · Esc quit",
    indicators: [
        "Creates a false sense of urgency",
        "Promises free items, prizes or winnings",
        "Uses excessive capital letters",
        "Asks you to click a link",
        "Requests personal or account information",
        "Mentions money, payments or fees",
        "Contains suspicious numbers or short codes",
        "Pushes you to reply, call or claim",
    ],
};

pub static ES: Strings = Strings {
    title: "LexiGuard",
    subtitle: "Detector de mensajes spam",
    input_label: "Mensaje",
    placeholder: "Escribe el texto aquí...",
    model_label: "Modelo",
    samples_label: "Ejemplos",
    result_label: "Resultado",
    result_placeholder: "Escribe o elige un mensaje y pulsa Enter para analizarlo.",
    analyzing: "Analizando...",
    verdict_spam: "Spam ❌",
    verdict_not_spam: "No es spam ✔",
    error_message: "Error al contactar con el servidor. Inténtalo de nuevo.",
    model_used: "Modelo usado",
    why_flagged: "Por qué parece spam",
    no_indicators: "No se encontraron patrones de spam comunes en el texto.",
    help: "Enter analizar · Tab foco · ↑↓ elegir · Ctrl+R aleatorio · F2 idioma · Esc salir",
    indicators: [
        "Crea una falsa sensación de urgencia",
        "Promete regalos, premios o ganancias",
        "Usa demasiadas mayúsculas",
        "Te pide hacer clic en un enlace",
        "Solicita datos personales o de la cuenta",
        "Menciona dinero, pagos o comisiones",
        "Contiene números sospechosos o códigos cortos",
        "Te presiona para responder, llamar o reclamar",
    ],
};
