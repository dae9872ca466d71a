//! Spam Indicators
//!
//! A fixed, ordered rule set that re-reads a message and names the textual
//! cues that make it look like spam. The result explains a verdict to the
//! user; it never feeds back into the verdict itself.
//!
//! Every rule is evaluated independently and the matches are reported in
//! declaration order, so adding a rule at the end never reorders existing
//! explanations.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A named textual cue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Indicator {
    /// Pressure to act fast ("now", "urgent", "last chance")
    Urgency,
    /// Free stuff, prizes and winnings
    FreePrize,
    /// Shouting: four or more uppercase letters in a row
    AllCaps,
    /// Links or "click here" cues
    ClickLink,
    /// Requests for passwords, account or identity details
    PersonalInfo,
    /// Money, payments and currency amounts
    MoneyRequest,
    /// Long digit runs or "call/text/code" followed by digits
    SuspiciousNumbers,
    /// Imperative verbs asking for a response
    ActionWords,
}

impl Indicator {
    /// All indicators in rule order
    pub const ALL: [Indicator; 8] = [
        Indicator::Urgency,
        Indicator::FreePrize,
        Indicator::AllCaps,
        Indicator::ClickLink,
        Indicator::PersonalInfo,
        Indicator::MoneyRequest,
        Indicator::SuspiciousNumbers,
        Indicator::ActionWords,
    ];

    /// Stable name used in explanations and string tables
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::FreePrize => "freePrize",
            Self::AllCaps => "allCaps",
            Self::ClickLink => "clickLink",
            Self::PersonalInfo => "personalInfo",
            Self::MoneyRequest => "moneyRequest",
            Self::SuspiciousNumbers => "suspiciousNumbers",
            Self::ActionWords => "actionWords",
        }
    }

    /// Look an indicator up by its stable name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    /// English explanation, for surfaces without their own string table
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Urgency => "Creates a false sense of urgency",
            Self::FreePrize => "Promises free items, prizes or winnings",
            Self::AllCaps => "Uses excessive capital letters",
            Self::ClickLink => "Asks you to click a link",
            Self::PersonalInfo => "Requests personal or account information",
            Self::MoneyRequest => "Mentions money, payments or fees",
            Self::SuspiciousNumbers => "Contains suspicious numbers or short codes",
            Self::ActionWords => "Pushes you to reply, call or claim",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
struct Rule {
    indicator: Indicator,
    regex: Regex,
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let mut rules = Vec::with_capacity(Indicator::ALL.len());

        let mut push = |indicator: Indicator, pattern: &'static str| {
            rules.push(Rule {
                indicator,
                regex: Regex::new(pattern).expect("indicator regex must compile"),
            });
        };

        push(
            Indicator::Urgency,
            r"(?i)\b(?:urgent(?:ly)?|immediately|now|asap|hurry|quick(?:ly)?|expir(?:e|es|ed|ing)|deadline|limited\s+time|act\s+now|last\s+chance|final\s+notice|today\s+only|right\s+away)\b",
        );
        push(
            Indicator::FreePrize,
            r"(?i)\b(?:free|prizes?|win|won|winner|winning|congratulations|congrats|rewards?|gift|bonus|selected|lottery|jackpot)\b",
        );
        // Case-sensitive on purpose: this one looks at the raw casing.
        push(Indicator::AllCaps, r"[A-Z]{4,}");
        push(
            Indicator::ClickLink,
            r"(?i)(?:\bclick\s+(?:here|now|below|the\s+link|this\s+link)\b|https?://|\bwww\.|\b(?:link|url|visit)\b|\bbit\.ly\b)",
        );
        push(
            Indicator::PersonalInfo,
            r"(?i)\b(?:password|ssn|social\s+security|bank\s+account|account\s+(?:number|details)|credit\s+card|pin|verify\s+your\s+(?:account|identity|details)|login|username|date\s+of\s+birth|personal\s+(?:information|details))\b",
        );
        push(
            Indicator::MoneyRequest,
            r"(?i)(?:[$£€]\s?\d|\b(?:cash|money|payment|pay|loan|refund|fees?|wire\s+transfer|bank\s+transfer|bitcoin|crypto|dollars?|invoice)\b)",
        );
        push(
            Indicator::SuspiciousNumbers,
            r"(?i)(?:\d{4,}|\b(?:call|text|code)\b:?\s*\d)",
        );
        push(
            Indicator::ActionWords,
            r"(?i)\b(?:reply|call|send|claim|click|text|buy|order|subscribe|confirm|verify|act|apply|redeem|download|register)\b",
        );

        rules
    })
}

/// Names the spam cues present in `message`, in rule order
///
/// Pure and deterministic. An empty message matches nothing.
#[must_use]
pub fn detect(message: &str) -> Vec<Indicator> {
    if message.is_empty() {
        return Vec::new();
    }

    rules()
        .iter()
        .filter(|rule| rule.regex.is_match(message))
        .map(|rule| rule.indicator)
        .collect()
}

/// Whether a single indicator fires for `message`
#[must_use]
pub fn matches(indicator: Indicator, message: &str) -> bool {
    rules()
        .iter()
        .find(|rule| rule.indicator == indicator)
        .is_some_and(|rule| rule.regex.is_match(message))
}
