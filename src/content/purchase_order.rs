//! Purchase order content

use crate::content::{add_days, long_date, Approvals, ContentGenerator, ContentTree, DocumentKind};
use crate::core::catalog::Theme;
use crate::core::context::GenerationContext;

const VENDORS: [&str; 4] = [
    "Precision Aerospace Supply",
    "Advanced Materials Co.",
    "SpaceTech Industries",
    "Orbital Components Inc.",
];

const CONTACTS: [&str; 4] = ["John Smith", "Sarah Johnson", "Robert Chen", "Maria Rodriguez"];

pub(crate) fn generate(
    gen: &ContentGenerator<'_>,
    ctx: &mut GenerationContext,
    stem: &str,
    theme: &Theme,
) -> ContentTree {
    let terms = gen.terms();
    let today = ctx.today();

    let metadata = vec![
        format!("Date: {}", long_date(today)),
        format!("Project: {}", theme.name),
        format!("Specification Reference: {}", ctx.pick(&theme.specifications)),
    ];
    let approvals = Approvals::new(
        "APPROVALS",
        ["Procurement Officer", "Technical Authority", "Quality Assurance"],
    );
    let mut tree = ContentTree::new(
        DocumentKind::PurchaseOrder,
        format!("PURCHASE ORDER: {}", stem),
        today,
        metadata,
        approvals,
    );

    let required = add_days(today, ctx.range(30, 180));
    tree.push_lines(
        "Purchase Order Information",
        vec![
            format!("Order Number: {}", stem),
            format!("Date Required: {}", long_date(required)),
            format!("Priority: {}", ctx.pick_str(&["Standard", "High", "Critical"])),
            "Procurement Category: Aerospace Components".to_string(),
        ],
    );

    tree.push_lines(
        "Vendor Information",
        vec![
            format!("Vendor: {}", ctx.pick_str(&VENDORS)),
            format!("Contact: {}", ctx.pick_str(&CONTACTS)),
            format!("Phone: (555) {}-{}", ctx.range(100, 999), ctx.range(1000, 9999)),
            format!("Email: contact@vendor-{}.com", ctx.range(100, 999)),
        ],
    );

    let components = ctx.sample(&theme.components, 3).join(", ");
    let materials = ctx.sample(&theme.materials, 3).join(", ");
    tree.push_lines(
        "Technical Requirements",
        vec![
            format!("Components: {}", components),
            format!("Materials: {}", materials),
            format!("Quantity: {} units", ctx.range(1, 10)),
            format!(
                "Drawing Reference: DWG-{}-{}",
                ctx.range(1000, 9999),
                ctx.pick_str(&["A", "B", "C", "D"])
            ),
        ],
    );

    tree.push_lines(
        "Quality Assurance Requirements",
        vec![
            format!("Quality Standard: {}", ctx.pick(&terms.quality_standards)),
            format!(
                "Inspection Level: {}",
                ctx.pick_str(&["Level I", "Level II", "Level III"])
            ),
            "Documentation Required: Material Certificates, Test Reports, Certificate of Conformance"
                .to_string(),
            format!(
                "Special Requirements: {}",
                ctx.pick_str(&[
                    "None",
                    "First Article Inspection",
                    "Source Inspection",
                    "Lot Traceability"
                ])
            ),
        ],
    );

    tree.push_lines(
        "Shipping Instructions",
        vec![
            format!("Delivery Terms: {}", ctx.pick(&terms.delivery_terms)),
            format!(
                "Carrier: {}",
                ctx.pick_str(&["FedEx", "UPS", "DHL", "Specialized Freight"])
            ),
            format!(
                "Packaging: {}",
                ctx.pick_str(&["Standard", "Custom Protective", "Clean Room", "Anti-Static"])
            ),
            format!(
                "Shipping Address: 1234 Aerospace Way, Engineering Building {}, Room {}",
                ctx.range(1, 20),
                ctx.range(100, 999)
            ),
        ],
    );

    tree.push_lines(
        "Terms and Conditions",
        vec![
            format!("Payment Terms: {}", ctx.pick(&terms.payment_terms)),
            format!("Warranty: {}", ctx.pick(&terms.warranty_periods)),
            format!("Acceptance Criteria: {}", ctx.pick(&terms.acceptance_criteria)),
            "Confidentiality: All technical information related to this purchase order is confidential and proprietary."
                .to_string(),
        ],
    );

    tree
}

#[cfg(test)]
mod tests {
    use crate::content::{ContentGenerator, SectionBody};
    use crate::core::catalog::Catalog;
    use crate::core::context::GenerationContext;

    #[test]
    fn test_purchase_order_shape() {
        let catalog = Catalog::load().unwrap();
        let gen = ContentGenerator::new(&catalog);
        let theme = &catalog.themes()[0];
        let mut ctx = GenerationContext::seeded(11);

        let tree = gen.purchase_order(&mut ctx, "PO123456", theme);
        assert!(tree.has_canonical_sections());
        assert_eq!(tree.title, "PURCHASE ORDER: PO123456");
        assert_eq!(tree.metadata.len(), 3);
        assert_eq!(tree.approvals.signers.len(), 3);

        let Some(SectionBody::Lines(lines)) = tree.section("Purchase Order Information").map(|s| &s.body) else {
            panic!("expected lines");
        };
        assert_eq!(lines[0], "Order Number: PO123456");
    }

    #[test]
    fn test_purchase_order_components_come_from_theme() {
        let catalog = Catalog::load().unwrap();
        let gen = ContentGenerator::new(&catalog);
        let theme = catalog.theme("Landing Gear").unwrap();
        let mut ctx = GenerationContext::seeded(12);

        let tree = gen.purchase_order(&mut ctx, "PO000001", theme);
        let Some(SectionBody::Lines(lines)) = tree.section("Technical Requirements").map(|s| &s.body) else {
            panic!("expected lines");
        };
        let listed = lines[0].trim_start_matches("Components: ");
        for component in listed.split(", ") {
            assert!(theme.components.iter().any(|c| c == component), "{component}");
        }
    }
}
