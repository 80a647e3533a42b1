//! Identifier and name generation
//!
//! Project IDs, PHB IDs and document numbers are random digit strings with
//! no uniqueness check. Collisions are tolerated: directories are created
//! with create-if-absent semantics, so a repeated ID merges into the
//! existing folder instead of failing.

use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::core::catalog::CompanyNames;
use crate::core::context::GenerationContext;

/// Prefix of project folder identifiers
pub const PROJECT_PREFIX: &str = "PD";
/// Prefix of per-test folder identifiers
pub const PHB_PREFIX: &str = "PHB";
/// Digits in project and PHB identifiers
pub const ID_DIGITS: usize = 8;
/// Digits in admin document numbers
pub const DOCUMENT_NUMBER_DIGITS: usize = 6;

/// Random decimal string of exactly `digits` characters (leading zeros allowed)
pub fn generate_document_number(ctx: &mut GenerationContext, digits: usize) -> String {
    (0..digits)
        .map(|_| char::from(b'0' + ctx.rng().random_range(0..10u8)))
        .collect()
}

/// `PD` followed by 8 random digits
pub fn generate_project_id(ctx: &mut GenerationContext) -> String {
    format!("{}{}", PROJECT_PREFIX, generate_document_number(ctx, ID_DIGITS))
}

/// `PHB` followed by 8 random digits
pub fn generate_phb_id(ctx: &mut GenerationContext) -> String {
    format!("{}{}", PHB_PREFIX, generate_document_number(ctx, ID_DIGITS))
}

/// Compose a company name from 2 or 3 vocabulary fragments.
///
/// Half the names use prefix + mid + suffix; the rest split evenly between
/// prefix + mid and mid + suffix.
pub fn generate_company_name(ctx: &mut GenerationContext, names: &CompanyNames) -> String {
    let prefix = ctx.pick(&names.prefixes);
    let mid = ctx.pick(&names.mids);
    let suffix = ctx.pick(&names.suffixes);

    if ctx.chance(0.5) {
        format!("{} {} {}", prefix, mid, suffix)
    } else if ctx.chance(0.5) {
        format!("{} {}", prefix, mid)
    } else {
        format!("{} {}", mid, suffix)
    }
}

/// A date between 1 and `max_days_back` days (inclusive) before the run date
pub fn generate_random_past_date(ctx: &mut GenerationContext, max_days_back: u32) -> NaiveDate {
    let days = ctx.range(1, i64::from(max_days_back.max(1))) as u64;
    let today = ctx.today();
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;

    #[test]
    fn test_project_id_shape() {
        let mut ctx = GenerationContext::seeded(3);
        for _ in 0..50 {
            let id = generate_project_id(&mut ctx);
            assert_eq!(id.len(), 10);
            assert!(id.starts_with("PD"));
            assert!(id[2..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_phb_id_shape() {
        let mut ctx = GenerationContext::seeded(4);
        let id = generate_phb_id(&mut ctx);
        assert_eq!(id.len(), 11);
        assert!(id.starts_with("PHB"));
        assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_document_number_length() {
        let mut ctx = GenerationContext::seeded(5);
        assert_eq!(generate_document_number(&mut ctx, 6).len(), 6);
        assert_eq!(generate_document_number(&mut ctx, 0), "");
    }

    #[test]
    fn test_company_name_has_two_or_three_parts() {
        let catalog = Catalog::load().unwrap();
        let mut ctx = GenerationContext::seeded(6);
        let mut seen_two = false;
        let mut seen_three = false;
        for _ in 0..200 {
            let name = generate_company_name(&mut ctx, catalog.company_names());
            let words = name.split_whitespace().count();
            assert!((2..=3).contains(&words), "{name}");
            seen_two |= words == 2;
            seen_three |= words == 3;
        }
        assert!(seen_two && seen_three);
    }

    #[test]
    fn test_past_date_window() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut ctx = GenerationContext::seeded(8).with_today(today);
        for _ in 0..500 {
            let date = generate_random_past_date(&mut ctx, 30);
            let back = (today - date).num_days();
            assert!((1..=30).contains(&back), "{back}");
        }
    }
}
