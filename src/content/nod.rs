//! Notice of deviation content
//!
//! The NOD date is read back out of the filename stem, so a NOD document
//! and its filename always agree. A stem without a valid date is a caller
//! bug and is reported, never papered over.

use crate::content::{
    add_days, long_date, short_date, Approvals, ContentError, ContentGenerator, ContentTree,
    DocumentKind, BLANK_DATE,
};
use crate::core::catalog::Theme;
use crate::core::context::GenerationContext;
use crate::core::layout::parse_nod_date;

const IMPACT_LEVELS: [&str; 4] = ["None", "Minor", "Moderate", "Significant"];

pub(crate) fn generate(
    _gen: &ContentGenerator<'_>,
    ctx: &mut GenerationContext,
    stem: &str,
    theme: &Theme,
) -> Result<ContentTree, ContentError> {
    let nod_date = parse_nod_date(stem).ok_or_else(|| ContentError::InvalidNodStem {
        stem: stem.to_string(),
    })?;

    let metadata = vec![
        format!("NOD Number: NOD-{}", ctx.range(1000, 9999)),
        format!("Date: {}", long_date(nod_date)),
        format!("Project: {}", theme.name),
        format!("Component: {}", ctx.pick(&theme.components)),
        format!("Test Reference: {}", ctx.pick(&theme.test_procedures)),
    ];

    let mut approvals = Approvals::new(
        "APPROVAL SIGNATURES",
        [
            "Originator",
            "Technical Authority",
            "Quality Assurance",
            "Customer (if required)",
        ],
    );
    approvals.dates = Some(vec![
        short_date(nod_date),
        BLANK_DATE.to_string(),
        BLANK_DATE.to_string(),
        BLANK_DATE.to_string(),
    ]);

    let mut tree = ContentTree::new(
        DocumentKind::Nod,
        "NOTICE OF DEVIATION".to_string(),
        nod_date,
        metadata,
        approvals,
    );

    tree.push_lines(
        "Notice Of Deviation",
        vec![format!(
            "This Notice of Deviation documents a deviation from the approved {} identified during {} of the {} {}.",
            ctx.pick_str(&["test procedure", "specification", "drawing", "process requirement"]),
            ctx.pick_str(&["testing", "inspection", "analysis", "manufacturing"]),
            theme.name,
            ctx.pick(&theme.components),
        )],
    );

    tree.push_lines(
        "Affected Requirements",
        vec![
            "The following requirements are affected by this deviation:".to_string(),
            String::new(),
            format!("Document: {}", ctx.pick(&theme.specifications)),
            format!(
                "Section: {}.{}.{}",
                ctx.range(1, 9),
                ctx.range(1, 9),
                ctx.range(1, 9)
            ),
            format!(
                "Requirement: {}",
                ctx.pick_str(&[
                    "Dimensional tolerance",
                    "Material property",
                    "Performance parameter",
                    "Test condition",
                    "Surface finish"
                ])
            ),
            String::new(),
            "Additional Reference Documents:".to_string(),
            format!("- Drawing DWG-{}", ctx.range(10000, 99999)),
            format!("- Test Procedure TP-{}", ctx.range(1000, 9999)),
        ],
    );

    let observed = add_days(nod_date, -ctx.range(1, 5));
    tree.push_lines(
        "Description of Deviation",
        vec![
            format!(
                "{} of the {}, the following deviation was observed:",
                ctx.pick_str(&[
                    "During testing",
                    "During inspection",
                    "During manufacturing",
                    "During assembly"
                ]),
                ctx.pick(&theme.components)
            ),
            String::new(),
            format!(
                "The {} value was {}% outside the specified tolerance.",
                ctx.pick(&theme.data_descriptions),
                ctx.range(5, 25)
            ),
            String::new(),
            format!(
                "Deviation was first observed on {} by {}.",
                long_date(observed),
                ctx.pick_str(&[
                    "Quality Inspector",
                    "Test Engineer",
                    "Manufacturing Engineer",
                    "Design Engineer"
                ])
            ),
        ],
    );

    tree.push_lines(
        "Technical Justification",
        vec![
            format!(
                "Analysis shows that the deviation is within acceptable margins for safe operation of the {}.",
                theme.name
            ),
            String::new(),
            "Supporting data:".to_string(),
            format!(
                "- {} analysis report AR-{}",
                ctx.pick_str(&["FEA", "CFD", "Thermal", "Structural"]),
                ctx.range(1000, 9999)
            ),
            format!("- Additional test data from Test Run TR-{}", ctx.range(1000, 9999)),
            "- Historical data from similar conditions on previous projects".to_string(),
        ],
    );

    tree.push_lines(
        "Impact Assessment",
        vec![
            format!("Impact on Form: {}", ctx.pick_str(&IMPACT_LEVELS)),
            format!("Impact on Fit: {}", ctx.pick_str(&IMPACT_LEVELS)),
            format!("Impact on Function: {}", ctx.pick_str(&IMPACT_LEVELS)),
            format!("Impact on Reliability: {}", ctx.pick_str(&IMPACT_LEVELS)),
            format!(
                "Impact on Schedule: {}",
                ctx.pick_str(&[
                    "None",
                    "Delay of 1-3 days",
                    "Delay of 4-7 days",
                    "Delay of 8-14 days"
                ])
            ),
            format!(
                "Impact on Cost: {}",
                ctx.pick_str(&[
                    "None",
                    "Minor increase < 5%",
                    "Moderate increase 5-10%",
                    "Significant increase > 10%"
                ])
            ),
            String::new(),
            format!(
                "Overall Risk Assessment: {}",
                ctx.pick_str(&["Low", "Medium", "High"])
            ),
        ],
    );

    let disposition = ctx.pick_str(&[
        "Use As Is",
        "Rework",
        "Repair",
        "Scrap and Replace",
        "Conditional Acceptance",
    ]);
    tree.push_lines(
        "Disposition and Approval",
        vec![
            format!("Recommended Disposition: {}", disposition),
            String::new(),
            "Justification for Disposition:".to_string(),
            "Conditional acceptance with additional monitoring during operation.".to_string(),
            String::new(),
            format!(
                "Additional verification test required: {}",
                ctx.pick(&theme.test_procedures)
            ),
        ],
    );

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use crate::content::{ContentError, ContentGenerator};
    use crate::core::catalog::Catalog;
    use crate::core::context::GenerationContext;
    use crate::core::layout::{nod_stem, parse_nod_date};

    #[test]
    fn test_nod_embeds_stem_date() {
        let catalog = Catalog::load().unwrap();
        let gen = ContentGenerator::new(&catalog);
        let mut ctx = GenerationContext::seeded(41);

        let tree = gen.nod(&mut ctx, "NOD_03.14.2024", &catalog.themes()[1]).unwrap();
        assert!(tree.has_canonical_sections());
        assert_eq!(tree.metadata[1], "Date: March 14, 2024");
        let dates = tree.approvals.dates.as_ref().unwrap();
        assert_eq!(dates[0], "03/14/2024");
        assert_eq!(dates.len(), tree.approvals.signers.len());
    }

    #[test]
    fn test_nod_rejects_invalid_calendar_date() {
        let catalog = Catalog::load().unwrap();
        let gen = ContentGenerator::new(&catalog);
        let mut ctx = GenerationContext::seeded(42);

        let err = gen.nod(&mut ctx, "NOD_13.45.2024", &catalog.themes()[0]).unwrap_err();
        assert_eq!(
            err,
            ContentError::InvalidNodStem {
                stem: "NOD_13.45.2024".to_string()
            }
        );
        assert!(gen.nod(&mut ctx, "deviation", &catalog.themes()[0]).is_err());
    }

    #[test]
    fn test_nod_stem_round_trip_from_generated_dates() {
        let mut ctx = GenerationContext::seeded(43);
        for _ in 0..100 {
            let date = crate::core::naming::generate_random_past_date(&mut ctx, 1095);
            let stem = nod_stem(date);
            let token = stem.trim_start_matches("NOD_");
            let reparsed = parse_nod_date(&stem).unwrap();
            assert_eq!(reparsed.format("%m.%d.%Y").to_string(), token);
        }
    }
}
