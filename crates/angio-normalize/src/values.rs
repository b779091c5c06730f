//! Cell-value normalization: vessels, sites, gender, booleans, numbers.
//!
//! Lookups return `None` for unrecognized input; the documented fallbacks
//! (LAD / proximal / male) are applied by the caller so the fallback event
//! can be logged to the batch diagnostics rather than vanish here.

use std::collections::BTreeMap;

use angio_model::{Gender, LesionSite, Vessel};

use crate::stenosis::scan_numbers;

/// Alias table per canonical vessel, checked in anatomical order.
const VESSEL_ALIASES: [(Vessel, &[&str]); 8] = [
    (
        Vessel::Lm,
        &["LM", "LMCA", "左主干", "左主", "主干", "LEFT_MAIN"],
    ),
    (
        Vessel::Lad,
        &["LAD", "LADCA", "左前降支", "左前降", "前降支", "LEFT_ANTERIOR_DESCENDING"],
    ),
    (
        Vessel::Lcx,
        &["LCX", "LCXCA", "左回旋支", "左回旋", "回旋支", "LEFT_CIRCUMFLEX"],
    ),
    (
        Vessel::Rca,
        &["RCA", "RCCA", "右冠状动脉", "右冠脉", "右冠", "RIGHT_CORONARY"],
    ),
    (
        Vessel::Om,
        &["OM", "OM1", "OM2", "钝缘支", "钝缘", "OBTUSE_MARGINAL"],
    ),
    (Vessel::D, &["D", "D1", "D2", "对角支", "对角", "DIAGONAL"]),
    (
        Vessel::Pda,
        &["PDA", "后降支", "后降", "POSTERIOR_DESCENDING"],
    ),
    (
        Vessel::Plv,
        &["PLV", "左室后支", "左室后", "POSTERIOR_LEFT_VENTRICULAR"],
    ),
];

const SITE_ALIASES: [(LesionSite, &[&str]); 3] = [
    (
        LesionSite::Proximal,
        &["proximal", "prox", "近段", "近端", "起始段", "开口段", "1段"],
    ),
    (
        LesionSite::Mid,
        &["mid", "middle", "中段", "中间段", "中部", "2段"],
    ),
    (
        LesionSite::Distal,
        &["distal", "dist", "远段", "远端", "末段", "终末段", "3段"],
    ),
];

/// Match a raw vessel cell against the alias tables.
///
/// Exact alias hits are preferred; containment in either direction is the
/// second pass, so "LAD近段病变" still resolves to LAD. `None` means the
/// caller should fall back to LAD and record a diagnostic.
pub fn match_vessel(raw: &str) -> Option<Vessel> {
    let value = raw.trim().to_uppercase();
    if value.is_empty() {
        return None;
    }

    for (vessel, aliases) in VESSEL_ALIASES {
        if aliases.iter().any(|a| *a == value) {
            return Some(vessel);
        }
    }
    for (vessel, aliases) in VESSEL_ALIASES {
        if aliases
            .iter()
            .any(|a| value.contains(a) || (a.len() > 1 && a.contains(&value)))
        {
            return Some(vessel);
        }
    }
    None
}

/// Match a raw location cell against the site alias tables.
pub fn match_site(raw: &str) -> Option<LesionSite> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }

    for (site, aliases) in SITE_ALIASES {
        if aliases.iter().any(|a| *a == value) {
            return Some(site);
        }
    }
    for (site, aliases) in SITE_ALIASES {
        if aliases.iter().any(|a| value.contains(a) || a.contains(&value)) {
            return Some(site);
        }
    }
    None
}

/// Gender lookup with a caller-supplied override layer.
///
/// The built-in table covers numeric registry codes (1/2) and common
/// Chinese/English tokens. Site-specific codes are injected as overrides and
/// take precedence, mirroring the external `stsex_mapping.json` convention.
#[derive(Debug, Clone, Default)]
pub struct GenderMap {
    overrides: BTreeMap<String, Gender>,
}

impl GenderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: BTreeMap<String, Gender>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Self { overrides }
    }

    /// Resolve a raw gender token; `None` for unknown input (caller defaults
    /// to male and records a diagnostic).
    pub fn resolve(&self, raw: &str) -> Option<Gender> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            return None;
        }
        if let Some(gender) = self.overrides.get(&value) {
            return Some(*gender);
        }
        match value.as_str() {
            "1" | "m" | "male" | "男" | "男性" => Some(Gender::Male),
            "2" | "f" | "female" | "女" | "女性" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Truthy tokens for boolean columns.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_uppercase().as_str(),
        "TRUE" | "YES" | "Y" | "1" | "是" | "有" | "阳性" | "+"
    )
}

/// First numeric substring of a cell, if any.
pub fn parse_number(raw: &str) -> Option<f64> {
    // Fast path: the whole cell is a number ("75", "-1.5").
    if let Ok(n) = raw.trim().parse::<f64>() {
        return Some(n);
    }
    scan_numbers(raw).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vessel_exact_codes_resolve() {
        assert_eq!(match_vessel("LAD"), Some(Vessel::Lad));
        assert_eq!(match_vessel("lm"), Some(Vessel::Lm));
        assert_eq!(match_vessel("左主干"), Some(Vessel::Lm));
        assert_eq!(match_vessel("D"), Some(Vessel::D));
    }

    #[test]
    fn vessel_containment_resolves_descriptions() {
        assert_eq!(match_vessel("左前降支近段"), Some(Vessel::Lad));
        assert_eq!(match_vessel("LEFT_MAIN"), Some(Vessel::Lm));
        assert_eq!(match_vessel("右冠状动脉远段"), Some(Vessel::Rca));
    }

    #[test]
    fn vessel_unknown_is_none() {
        assert_eq!(match_vessel("LIMA"), None);
        assert_eq!(match_vessel(""), None);
    }

    #[test]
    fn site_aliases_resolve() {
        assert_eq!(match_site("proximal"), Some(LesionSite::Proximal));
        assert_eq!(match_site("近端"), Some(LesionSite::Proximal));
        assert_eq!(match_site("中段"), Some(LesionSite::Mid));
        assert_eq!(match_site("终末段"), Some(LesionSite::Distal));
        assert_eq!(match_site("2段"), Some(LesionSite::Mid));
        assert_eq!(match_site("somewhere"), None);
    }

    #[test]
    fn gender_builtin_table() {
        let map = GenderMap::new();
        assert_eq!(map.resolve("1"), Some(Gender::Male));
        assert_eq!(map.resolve("2"), Some(Gender::Female));
        assert_eq!(map.resolve("男"), Some(Gender::Male));
        assert_eq!(map.resolve("Female"), Some(Gender::Female));
        assert_eq!(map.resolve("unknown"), None);
    }

    #[test]
    fn gender_overrides_take_precedence() {
        let mut overrides = BTreeMap::new();
        // A site that codes female as 0 and male as 1.
        overrides.insert("0".to_string(), Gender::Female);
        overrides.insert("2".to_string(), Gender::Male);
        let map = GenderMap::with_overrides(overrides);
        assert_eq!(map.resolve("0"), Some(Gender::Female));
        // Override beats the built-in 2 -> female.
        assert_eq!(map.resolve("2"), Some(Gender::Male));
        // Built-in table still answers for untouched tokens.
        assert_eq!(map.resolve("女"), Some(Gender::Female));
    }

    #[test]
    fn bool_tokens() {
        for token in ["TRUE", "yes", "Y", "1", "是", "有", "阳性", "+"] {
            assert!(parse_bool(token), "expected truthy: {token}");
        }
        for token in ["", "no", "0", "否", "无", "FALSE"] {
            assert!(!parse_bool(token), "expected falsy: {token}");
        }
    }

    #[test]
    fn numbers_from_plain_and_embedded_text() {
        assert_eq!(parse_number("75"), Some(75.0));
        assert_eq!(parse_number(" 2.3 "), Some(2.3));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number("约20mm"), Some(20.0));
        assert_eq!(parse_number("无"), None);
    }
}
