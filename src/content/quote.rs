//! Quote content
//!
//! The cost breakdown total is always the sum of its five line items.

use crate::content::{
    add_days, format_usd, long_date, Approvals, Contact, ContentGenerator, ContentTree,
    DocumentKind, Table,
};
use crate::core::catalog::Theme;
use crate::core::context::GenerationContext;

const CONTACTS: [&str; 4] = ["John Smith", "Sarah Johnson", "Robert Chen", "Maria Rodriguez"];

/// The five cost components of a quote, in dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostBreakdown {
    pub engineering: u64,
    pub materials: u64,
    pub manufacturing: u64,
    pub testing: u64,
    pub documentation: u64,
}

impl CostBreakdown {
    /// Each component is a multiple of 1000 within its fixed range
    pub fn draw(ctx: &mut GenerationContext) -> Self {
        Self {
            engineering: thousands(ctx, 20, 80),
            materials: thousands(ctx, 15, 60),
            manufacturing: thousands(ctx, 30, 100),
            testing: thousands(ctx, 10, 40),
            documentation: thousands(ctx, 5, 15),
        }
    }

    pub fn total(&self) -> u64 {
        self.engineering + self.materials + self.manufacturing + self.testing + self.documentation
    }

    /// `Item | Cost (USD)` rows ending with the total
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(["Item", "Cost (USD)"]);
        for (item, cost) in [
            ("Engineering", self.engineering),
            ("Materials", self.materials),
            ("Manufacturing", self.manufacturing),
            ("Testing", self.testing),
            ("Documentation", self.documentation),
            ("Total", self.total()),
        ] {
            table.push_row([item.to_string(), format_usd(cost)]);
        }
        table
    }
}

fn thousands(ctx: &mut GenerationContext, low: i64, high: i64) -> u64 {
    ctx.range(low, high) as u64 * 1000
}

pub(crate) fn generate(
    gen: &ContentGenerator<'_>,
    ctx: &mut GenerationContext,
    stem: &str,
    theme: &Theme,
) -> ContentTree {
    let terms = gen.terms();
    let today = ctx.today();
    let valid_until = add_days(today, ctx.range(30, 90));
    let company = format!(
        "{} {}",
        ctx.pick_str(&["Precision", "Advanced", "Stellar", "Orbital"]),
        ctx.pick_str(&["Aerospace", "Technologies", "Engineering", "Systems"])
    );

    let metadata = vec![
        format!("Vendor: {}", company),
        format!("123 Technology Lane, Suite {}", ctx.range(100, 999)),
        format!("Aerospace Park, CA {}", ctx.range(90000, 96000)),
        format!("Date: {}", long_date(today)),
        format!("Valid Until: {}", long_date(valid_until)),
        format!("Project: {}", theme.name),
        format!("Customer Reference: CR-{}", ctx.range(10000, 99999)),
    ];
    let approvals = Approvals::new("ACCEPTANCE", ["Vendor Representative", "Customer Acceptance"]);
    let mut tree = ContentTree::new(
        DocumentKind::Quote,
        format!("QUOTATION: {}", stem),
        today,
        metadata,
        approvals,
    );

    tree.push_lines(
        "Executive Summary",
        vec![format!(
            "{} is pleased to present this quotation for the {} project. This quote covers the {} of {} components that meet or exceed the requirements specified in {}. Our team has extensive experience with similar aerospace applications and is committed to delivering high-quality products that meet your schedule and performance requirements.",
            company,
            theme.name,
            ctx.pick_str(&["design", "manufacturing", "testing", "certification"]),
            ctx.pick(&theme.components),
            ctx.pick(&theme.specifications),
        )],
    );

    let components = ctx.sample(&theme.components, 3).join(", ");
    let procedures = ctx.sample(&theme.test_procedures, 3).join(", ");
    tree.push_lines(
        "Scope of Work",
        vec![
            "This quotation includes the following scope:".to_string(),
            format!("- Engineering analysis and design optimization for {}", components),
            "- Material procurement and quality verification".to_string(),
            format!("- Manufacturing and assembly of {} units", ctx.range(1, 5)),
            format!("- Testing per {}", procedures),
            "- Documentation package including test reports and material certifications".to_string(),
            format!(
                "- {} technical review meetings with customer representatives",
                ctx.range(2, 4)
            ),
        ],
    );

    tree.push_lines(
        "Technical Approach",
        vec![
            "Our approach for this project includes:".to_string(),
            String::new(),
            format!(
                "- Using {} material qualified to {}",
                ctx.pick(&theme.materials),
                ctx.pick(&theme.specifications)
            ),
            format!(
                "- Implementing {} to ensure consistent quality",
                ctx.pick_str(&[
                    "advanced manufacturing techniques",
                    "proprietary process controls",
                    "specialized tooling"
                ])
            ),
            format!(
                "- Conducting {} according to industry standards",
                ctx.pick(&theme.test_procedures)
            ),
            format!(
                "- Performing all work in our {} certified facility",
                ctx.pick_str(&["ISO 9001", "AS9100D"])
            ),
            "- Providing traceability for all materials and processes".to_string(),
        ],
    );

    let start = add_days(today, ctx.range(7, 21));
    let design = ctx.range(2, 6);
    let manufacturing = ctx.range(4, 12);
    let testing = ctx.range(2, 6);
    let delivery = add_days(start, (design + manufacturing + testing) * 7);
    tree.push_lines(
        "Schedule",
        vec![
            "Preliminary Schedule:".to_string(),
            format!("- Project Start: {}", long_date(start)),
            format!("- Design Phase: {} weeks", design),
            format!("- Manufacturing: {} weeks", manufacturing),
            format!("- Testing: {} weeks", testing),
            format!("- Final Delivery: {}", long_date(delivery)),
            String::new(),
            "This schedule assumes timely customer reviews and approvals at key milestones.".to_string(),
        ],
    );

    tree.push_table("Cost Breakdown", CostBreakdown::draw(ctx).to_table());

    tree.push_lines(
        "Terms and Conditions",
        vec![
            format!("Payment Terms: {}", ctx.pick(&terms.payment_terms)),
            format!("Delivery: {}", ctx.pick(&terms.delivery_terms)),
            format!("Warranty: {} from date of delivery", ctx.pick(&terms.warranty_periods)),
            format!(
                "Validity: This quote is valid for {} days from the date of issue",
                ctx.range(30, 90)
            ),
            String::new(),
            "This quotation is subject to our standard terms and conditions, which are available upon request.".to_string(),
            "All technical information provided in this quote is considered proprietary and confidential.".to_string(),
        ],
    );

    tree.contact = Some(Contact {
        title: "CONTACT INFORMATION".to_string(),
        details: vec![
            format!("Primary Contact: {}", ctx.pick_str(&CONTACTS)),
            format!(
                "Title: {}",
                ctx.pick_str(&[
                    "Sales Engineer",
                    "Project Manager",
                    "Business Development Manager",
                    "Technical Director"
                ])
            ),
            format!("Phone: (555) {}-{}", ctx.range(100, 999), ctx.range(1000, 9999)),
            format!("Email: contact@{}.com", company.to_lowercase().replace(' ', "")),
        ],
    });

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SectionBody;
    use crate::core::catalog::Catalog;

    fn parse_usd(s: &str) -> u64 {
        s.trim_start_matches('$').replace(',', "").parse().unwrap()
    }

    #[test]
    fn test_quote_shape() {
        let catalog = Catalog::load().unwrap();
        let gen = ContentGenerator::new(&catalog);
        let mut ctx = GenerationContext::seeded(21);
        let tree = gen.quote(&mut ctx, "Quote654321", &catalog.themes()[3]);

        assert!(tree.has_canonical_sections());
        assert_eq!(tree.title, "QUOTATION: Quote654321");
        assert!(tree.contact.is_some());
    }

    #[test]
    fn test_cost_breakdown_total_is_sum_of_items() {
        let catalog = Catalog::load().unwrap();
        let gen = ContentGenerator::new(&catalog);
        let mut ctx = GenerationContext::seeded(22);

        for theme in catalog.themes() {
            let tree = gen.quote(&mut ctx, "Quote000000", theme);
            let Some(SectionBody::Table(table)) = tree.section("Cost Breakdown").map(|s| &s.body) else {
                panic!("cost breakdown must be a table");
            };
            assert_eq!(table.headers, vec!["Item", "Cost (USD)"]);
            assert_eq!(table.rows.len(), 6);
            assert_eq!(table.rows[5][0], "Total");

            let items: u64 = table.rows[..5].iter().map(|r| parse_usd(&r[1])).sum();
            assert_eq!(parse_usd(&table.rows[5][1]), items);
            for row in &table.rows {
                assert!(row[1].starts_with('$'));
                assert_eq!(parse_usd(&row[1]) % 1000, 0);
            }
        }
    }

    #[test]
    fn test_cost_ranges() {
        let mut ctx = GenerationContext::seeded(23);
        for _ in 0..200 {
            let c = CostBreakdown::draw(&mut ctx);
            assert!((20_000..=80_000).contains(&c.engineering));
            assert!((15_000..=60_000).contains(&c.materials));
            assert!((30_000..=100_000).contains(&c.manufacturing));
            assert!((10_000..=40_000).contains(&c.testing));
            assert!((5_000..=15_000).contains(&c.documentation));
        }
    }
}
