//! Static route table.
//!
//! Each route binds one inbound path to a downstream target family, an embed
//! title and color, and the ordered list of ticket fields to render.

use std::ops::RangeInclusive;

/// Downstream chat webhook family a route forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Reports,
    Contacts,
    Wiki,
    Models,
    Applications,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Reports => "reports",
            Target::Contacts => "contacts",
            Target::Wiki => "wiki",
            Target::Models => "models",
            Target::Applications => "applications",
        }
    }
}

/// Extraction rule for one or more embed fields.
///
/// Paths are key sequences from the payload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Always rendered; the request is rejected when the value is falsy.
    Required {
        name: &'static str,
        path: &'static [&'static str],
    },
    /// Rendered only when the value is truthy.
    Optional {
        name: &'static str,
        path: &'static [&'static str],
    },
    /// Probes `ticket.<key><n>` for every `n` in `range`, rendering each
    /// truthy value as `"<name> <n>"`.
    Numbered {
        name: &'static str,
        key: &'static str,
        range: RangeInclusive<u8>,
    },
}

/// One inbound route.
#[derive(Debug)]
pub struct Route {
    /// Path segment without the leading slash
    pub id: &'static str,
    pub title: &'static str,
    pub color: u32,
    pub target: Target,
    pub fields: &'static [FieldRule],
}

pub const COLOR_ORANGE: u32 = 0xE67E22;
pub const COLOR_PURPLE: u32 = 0x9B59B6;
pub const COLOR_BLUE: u32 = 0x3498DB;
pub const COLOR_GREEN: u32 = 0x2ECC71;
pub const COLOR_TEAL: u32 = 0x1ABC9C;
pub const COLOR_GOLD: u32 = 0xF1C40F;

const ALTERNATIVE_CONTACT: FieldRule = FieldRule::Optional {
    name: "Alternative Contact",
    path: &["ticket", "aalternative_contact"],
};

const USER: FieldRule = FieldRule::Required {
    name: "User",
    path: &["ticket", "customer", "firstname"],
};

const USER_ID: FieldRule = FieldRule::Required {
    name: "User ID",
    path: &["ticket", "customer", "login"],
};

const REPORT_FIELDS: &[FieldRule] = &[
    FieldRule::Required {
        name: "Reporter",
        path: &["ticket", "customer", "firstname"],
    },
    ALTERNATIVE_CONTACT,
    FieldRule::Optional {
        name: "Reported User Username",
        path: &["ticket", "reported_ausername"],
    },
    FieldRule::Optional {
        name: "Reported User ID",
        path: &["ticket", "reported_buseruid"],
    },
    FieldRule::Optional {
        name: "Proof",
        path: &["ticket", "reported_zproof"],
    },
];

const COMMUNITY_FIELDS: &[FieldRule] = &[
    USER,
    USER_ID,
    ALTERNATIVE_CONTACT,
    FieldRule::Optional {
        name: "App Type",
        path: &["ticket", "aaactivecontacttype"],
    },
    FieldRule::Optional {
        name: "Community Name",
        path: &["ticket", "community_aname"],
    },
    FieldRule::Optional {
        name: "Community Description",
        path: &["ticket", "community_bdescription"],
    },
    FieldRule::Optional {
        name: "Join Link",
        path: &["ticket", "community_cjoinlink"],
    },
    FieldRule::Optional {
        name: "Other Link",
        path: &["ticket", "community_dotherlinks"],
    },
    FieldRule::Optional {
        name: "Embed Color",
        path: &["ticket", "community_ecolor"],
    },
    FieldRule::Optional {
        name: "Icon",
        path: &["ticket", "community_ficon"],
    },
];

const GENERAL_FIELDS: &[FieldRule] = &[
    USER,
    USER_ID,
    ALTERNATIVE_CONTACT,
    FieldRule::Optional {
        name: "What is this about?",
        path: &["ticket", "aaactivecontacttype"],
    },
];

const WIKI_FIELDS: &[FieldRule] = &[
    USER,
    USER_ID,
    ALTERNATIVE_CONTACT,
    FieldRule::Optional {
        name: "Wiki Page",
        path: &["ticket", "wiki_apage"],
    },
    FieldRule::Optional {
        name: "Change Type",
        path: &["ticket", "wiki_bchangetype"],
    },
];

const MODEL_FIELDS: &[FieldRule] = &[
    USER,
    USER_ID,
    ALTERNATIVE_CONTACT,
    FieldRule::Optional {
        name: "Model Name",
        path: &["ticket", "model_aname"],
    },
    FieldRule::Optional {
        name: "Model Type",
        path: &["ticket", "model_btype"],
    },
    FieldRule::Numbered {
        name: "Link",
        key: "submission_link",
        range: 1..=5,
    },
];

/// Shared by every role-application route; only the title differs.
pub const ROLE_APPLICATION_FIELDS: &[FieldRule] = &[
    USER,
    USER_ID,
    ALTERNATIVE_CONTACT,
    FieldRule::Optional {
        name: "Age",
        path: &["ticket", "application_aage"],
    },
    FieldRule::Optional {
        name: "Timezone",
        path: &["ticket", "application_btimezone"],
    },
    FieldRule::Optional {
        name: "Experience",
        path: &["ticket", "application_cexperience"],
    },
    FieldRule::Optional {
        name: "Motivation",
        path: &["ticket", "application_dmotivation"],
    },
];

const fn role_application(id: &'static str, title: &'static str) -> Route {
    Route {
        id,
        title,
        color: COLOR_GOLD,
        target: Target::Applications,
        fields: ROLE_APPLICATION_FIELDS,
    }
}

/// Every route the relay serves.
pub static ROUTES: &[Route] = &[
    Route {
        id: "reports",
        title: "New User Report",
        color: COLOR_ORANGE,
        target: Target::Reports,
        fields: REPORT_FIELDS,
    },
    Route {
        id: "community",
        title: "Hub Application",
        color: COLOR_PURPLE,
        target: Target::Contacts,
        fields: COMMUNITY_FIELDS,
    },
    Route {
        id: "general",
        title: "Contact Response",
        color: COLOR_BLUE,
        target: Target::Contacts,
        fields: GENERAL_FIELDS,
    },
    Route {
        id: "wiki",
        title: "Wiki Contribution",
        color: COLOR_GREEN,
        target: Target::Wiki,
        fields: WIKI_FIELDS,
    },
    Route {
        id: "models",
        title: "Model Submission",
        color: COLOR_TEAL,
        target: Target::Models,
        fields: MODEL_FIELDS,
    },
    role_application("modapps", "Moderator Application"),
    role_application("staffapps", "Staff Application"),
];

/// Look up a route by its path segment.
pub fn find_route(id: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_known_routes() {
        for id in [
            "reports",
            "community",
            "general",
            "wiki",
            "models",
            "modapps",
            "staffapps",
        ] {
            assert_eq!(find_route(id).map(|r| r.id), Some(id));
        }
    }

    #[test]
    fn test_find_unknown_route() {
        assert!(find_route("").is_none());
        assert!(find_route("Reports").is_none());
        assert!(find_route("admin").is_none());
    }

    #[test]
    fn test_route_ids_unique() {
        let ids: HashSet<_> = ROUTES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), ROUTES.len());
    }

    #[test]
    fn test_role_applications_share_rules_and_target() {
        let modapps = find_route("modapps").unwrap();
        let staffapps = find_route("staffapps").unwrap();

        assert_eq!(modapps.fields, staffapps.fields);
        assert_eq!(modapps.target, staffapps.target);
        assert_eq!(modapps.color, staffapps.color);
        assert_ne!(modapps.title, staffapps.title);
    }

    #[test]
    fn test_models_probe_five_links() {
        let models = find_route("models").unwrap();
        let numbered: Vec<_> = models
            .fields
            .iter()
            .filter_map(|rule| match rule {
                FieldRule::Numbered { range, .. } => Some(range.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(numbered, vec![1..=5]);
    }

    #[test]
    fn test_contact_routes_share_target() {
        assert_eq!(find_route("community").unwrap().target, Target::Contacts);
        assert_eq!(find_route("general").unwrap().target, Target::Contacts);
    }
}
