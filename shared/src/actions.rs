/// Closed classification of the action tags the host page puts on an
/// occupant's icon node. Tags that belong to the action slot but match
/// nothing known become `Unclassified` rather than silently disappearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTag {
    Combat,
    Search,
    Rest,
    Hide,
    Scan,
    Heal,
    Work,
    Destruction,
    Repair,
    Idle,
    KnockedOut,
    Moving,
    Unclassified,
}

/// Ordered matcher table. Earlier entries win when a node carries several
/// recognized tags, matching the host page's own precedence.
const TAG_TABLE: &[(&str, ActionTag)] = &[
    ("en_combat", ActionTag::Combat),
    ("encombat", ActionTag::Combat),
    ("recherche", ActionTag::Search),
    ("fouille", ActionTag::Search),
    ("repos", ActionTag::Rest),
    ("cacher", ActionTag::Hide),
    ("scruter", ActionTag::Scan),
    ("soin", ActionTag::Heal),
    ("travail", ActionTag::Work),
    ("destruction", ActionTag::Destruction),
    ("reparation", ActionTag::Repair),
    ("aucune", ActionTag::Idle),
    ("noaction", ActionTag::Idle),
    ("ko", ActionTag::KnockedOut),
    ("deplacement", ActionTag::Moving),
];

impl ActionTag {
    /// Classify a node's action-slot tags. `None` means the node carries no
    /// action tag at all; an unrecognized tag yields `Unclassified`.
    pub fn classify<S: AsRef<str>>(tags: &[S]) -> Option<ActionTag> {
        if tags.is_empty() {
            return None;
        }
        for (class, tag) in TAG_TABLE {
            if tags.iter().any(|t| t.as_ref() == *class) {
                return Some(*tag);
            }
        }
        Some(ActionTag::Unclassified)
    }

    /// Canonical name, used for the diagnostic `data-pion-action` attribute.
    pub const fn name(self) -> &'static str {
        match self {
            ActionTag::Combat => "en_combat",
            ActionTag::Search => "recherche",
            ActionTag::Rest => "repos",
            ActionTag::Hide => "cacher",
            ActionTag::Scan => "scruter",
            ActionTag::Heal => "soin",
            ActionTag::Work => "travail",
            ActionTag::Destruction => "destruction",
            ActionTag::Repair => "reparation",
            ActionTag::Idle => "aucune",
            ActionTag::KnockedOut => "ko",
            ActionTag::Moving => "deplacement",
            ActionTag::Unclassified => "unclassified",
        }
    }

    /// Glyph shown in the action-icon overlay node. Idle and unclassified
    /// occupants get none.
    pub const fn glyph(self) -> Option<&'static str> {
        match self {
            ActionTag::Combat => Some("\u{2694}\u{FE0F}"),
            ActionTag::Search => Some("\u{1F9D0}"),
            ActionTag::Rest => Some("\u{1F634}"),
            ActionTag::Hide => Some("\u{1FAE3}"),
            ActionTag::Scan => Some("\u{1F440}"),
            ActionTag::Heal => Some("\u{1F48A}"),
            ActionTag::Work => Some("\u{2699}\u{FE0F}"),
            ActionTag::Destruction => Some("\u{1F4A5}"),
            ActionTag::Repair => Some("\u{1F527}"),
            ActionTag::KnockedOut => Some("\u{1F480}"),
            ActionTag::Moving => Some("\u{1F5FA}\u{FE0F}"),
            ActionTag::Idle | ActionTag::Unclassified => None,
        }
    }
}

/// Slice-ordering priority for multi-occupant containers: combatants are the
/// most prominent slice, then connected occupants, then the rest.
pub fn occupant_priority(action: Option<ActionTag>, connected: bool) -> u8 {
    if action == Some(ActionTag::Combat) {
        3
    } else if connected {
        2
    } else {
        1
    }
}
