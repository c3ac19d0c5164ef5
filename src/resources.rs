//! Support resources recommended for each severity tier.

use serde::Serialize;

use crate::analysis::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    SelfHelp,
    Education,
    Therapy,
    Support,
    Crisis,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::SelfHelp => "self-help",
            ResourceKind::Education => "education",
            ResourceKind::Therapy => "therapy",
            ResourceKind::Support => "support",
            ResourceKind::Crisis => "crisis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub title: &'static str,
    pub description: &'static str,
    pub kind: ResourceKind,
    /// Web link, or a `tel:` / `sms:` URI for crisis lines
    pub url: &'static str,
}

const LOW: &[Resource] = &[
    Resource {
        title: "Mindfulness Meditation Apps",
        description: "Headspace, Calm, or Insight Timer for daily meditation",
        kind: ResourceKind::SelfHelp,
        url: "https://www.headspace.com",
    },
    Resource {
        title: "Mental Health First Aid",
        description: "Learn about mental health basics and self-care",
        kind: ResourceKind::Education,
        url: "https://www.mentalhealthfirstaid.org",
    },
];

const MODERATE: &[Resource] = &[
    Resource {
        title: "Online Therapy Platforms",
        description: "BetterHelp, Talkspace, or Psychology Today",
        kind: ResourceKind::Therapy,
        url: "https://www.psychologytoday.com",
    },
    Resource {
        title: "Support Groups",
        description: "Local or online peer support communities",
        kind: ResourceKind::Support,
        url: "https://www.nami.org/Support-Education/Support-Groups",
    },
];

const HIGH: &[Resource] = &[
    Resource {
        title: "National Suicide Prevention Lifeline",
        description: "Call 988 for immediate help",
        kind: ResourceKind::Crisis,
        url: "tel:988",
    },
    Resource {
        title: "Crisis Text Line",
        description: "Text HOME to 741741 for immediate support",
        kind: ResourceKind::Crisis,
        url: "sms:741741",
    },
];

pub fn recommendations_for(severity: Severity) -> &'static [Resource] {
    match severity {
        Severity::Low => LOW,
        Severity::Moderate => MODERATE,
        Severity::High => HIGH,
    }
}

/// Crisis lines shown by the emergency panel regardless of any analysis.
pub fn crisis_resources() -> &'static [Resource] {
    HIGH
}
