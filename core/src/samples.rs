//! Example messages a user can load instead of typing

/// Whether a sample is meant to look like spam
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    /// Typical spam / phishing text
    Spam,
    /// Everyday, harmless text
    Safe,
}

/// A ready-made message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Short label for lists
    pub label: &'static str,
    /// Full message text
    pub text: &'static str,
    /// Expected flavour of the message
    pub kind: SampleKind,
}

/// Built-in samples, spam first
pub const SAMPLES: &[Sample] = &[
    Sample {
        label: "Prize winner",
        text: "CONGRATULATIONS! You've won a FREE iPhone! Click here to claim your prize NOW!!!",
        kind: SampleKind::Spam,
    },
    Sample {
        label: "Bank alert",
        text: "URGENT: Your bank account has been suspended. Verify your account details at http://secure-bank-login.example immediately.",
        kind: SampleKind::Spam,
    },
    Sample {
        label: "Short code",
        text: "You have been selected for a $1000 gift card. Text WIN to 80082 to redeem.",
        kind: SampleKind::Spam,
    },
    Sample {
        label: "Coffee plans",
        text: "Hey, are we still meeting for coffee tomorrow at 3pm?",
        kind: SampleKind::Safe,
    },
    Sample {
        label: "Running late",
        text: "Running a bit late, see you in 10 minutes.",
        kind: SampleKind::Safe,
    },
    Sample {
        label: "Homework",
        text: "Can you send me the notes from today's lecture when you get a chance?",
        kind: SampleKind::Safe,
    },
];

/// Sample at `index`, if any
#[must_use]
pub fn get(index: usize) -> Option<&'static Sample> {
    SAMPLES.get(index)
}
