//! Technical specification content

use crate::content::{long_date, Approvals, ContentGenerator, ContentTree, DocumentKind};
use crate::core::catalog::Theme;
use crate::core::context::GenerationContext;

pub(crate) fn generate(
    _gen: &ContentGenerator<'_>,
    ctx: &mut GenerationContext,
    stem: &str,
    theme: &Theme,
) -> ContentTree {
    let today = ctx.today();
    let metadata = vec![
        format!("Document Number: {}", ctx.pick(&theme.specifications)),
        format!("Revision: {}", ctx.pick_str(&["A", "B", "C", "D", "E"])),
        format!("Release Date: {}", long_date(today)),
        format!("Project: {}", theme.name),
    ];

    let mut approvals = Approvals::new("APPROVALS", ["Prepared By", "Reviewed By", "Approved By"]);
    approvals.roles = Some(vec![
        ctx.pick_str(&["Engineering", "Systems", "Design Engineer"]),
        ctx.pick_str(&["Quality Assurance", "Technical Lead", "Chief Engineer"]),
        ctx.pick_str(&["Program Manager", "Project Director", "Engineering Manager"]),
    ]);

    let mut tree = ContentTree::new(
        DocumentKind::Specification,
        format!("TECHNICAL SPECIFICATION: {}", stem),
        today,
        metadata,
        approvals,
    );

    tree.push_lines(
        "Scope",
        vec![
            format!(
                "This specification establishes the requirements for the design, materials, manufacturing, testing, and quality assurance for the {name} system and its components. It applies to all {name} hardware used in aerospace applications classified as {class}.",
                name = theme.name,
                class = ctx.pick_str(&["Flight Critical", "Mission Critical", "Safety Critical"]),
            ),
            String::new(),
            "The requirements herein apply to the following components:".to_string(),
            format!("- {}", ctx.pick(&theme.components)),
            format!("- {}", ctx.pick(&theme.components)),
            format!("- {}", ctx.pick(&theme.components)),
        ],
    );

    tree.push_lines(
        "Applicable Documents",
        vec![
            "The following documents form a part of this specification to the extent specified herein:".to_string(),
            String::new(),
            "Industry Standards:".to_string(),
            format!("- {}", ctx.pick(&theme.specifications)),
            format!("- ASTM {}", ctx.pick_str(&["E8", "E9", "E21", "E238", "E466"])),
            format!("- MIL-STD-{}", ctx.range(100, 999)),
            format!("- RTCA DO-{}", ctx.range(100, 400)),
            String::new(),
            "Company Documents:".to_string(),
            format!("- Quality Manual QM-{}", ctx.range(1000, 9999)),
            format!(
                "- Process Specification PS-{}-{}",
                ctx.range(1000, 9999),
                ctx.pick_str(&["A", "B", "C"])
            ),
            format!("- Test Procedure TP-{}", ctx.range(1000, 9999)),
        ],
    );

    let materials = ctx.sample(&theme.materials, 3).join(", ");
    let metric = ctx.pick(&theme.data_descriptions);
    tree.push_lines(
        "Requirements",
        vec![
            "3.1 Physical Requirements".to_string(),
            format!("   3.1.1 Dimensions: Per Drawing DWG-{}", ctx.range(10000, 99999)),
            format!(
                "   3.1.2 Weight: Maximum {} {}",
                ctx.range(5, 500),
                ctx.pick_str(&["grams", "kg", "lbs"])
            ),
            format!(
                "   3.1.3 Finish: {}",
                ctx.pick_str(&["Anodized", "Passivated", "Painted", "Plated", "As Machined"])
            ),
            String::new(),
            "3.2 Material Requirements".to_string(),
            format!("   3.2.1 Approved Materials: {}", materials),
            "   3.2.2 Material Certification: Required for all raw materials".to_string(),
            "   3.2.3 Prohibited Materials: Cadmium, mercury, zinc, pure tin".to_string(),
            String::new(),
            "3.3 Performance Requirements".to_string(),
            format!(
                "   3.3.1 Operating Temperature: {} °C",
                ctx.pick_str(&["-65 to +160", "-54 to +125", "-45 to +85"])
            ),
            format!("   3.3.2 {}: Minimum {}% of nominal", metric, ctx.range(80, 99)),
            format!(
                "   3.3.3 Service Life: Minimum {} years or {} cycles",
                ctx.range(5, 15),
                ctx.range(1000, 10000)
            ),
            String::new(),
            "3.4 Environmental Requirements".to_string(),
            format!(
                "   3.4.1 Shall withstand {} per Section 4",
                ctx.pick_str(&["vibration", "shock", "thermal cycling", "vacuum", "radiation"])
            ),
            format!("   3.4.2 Humidity Resistance: Up to {}% RH", ctx.range(85, 100)),
        ],
    );

    let procedures = ctx.sample(&theme.test_procedures, 3).join(", ");
    tree.push_lines(
        "Verification",
        vec![
            "Verification methods shall include:".to_string(),
            String::new(),
            "4.1 Analysis".to_string(),
            format!(
                "   Engineering analysis shall be performed to verify compliance with requirements {}.1, {}.2, and {}.3.",
                ctx.range(3, 5),
                ctx.range(3, 5),
                ctx.range(3, 5)
            ),
            String::new(),
            "4.2 Demonstration".to_string(),
            format!(
                "   Functional demonstration shall be performed to verify requirements {}.4 and {}.5.",
                ctx.range(3, 5),
                ctx.range(3, 5)
            ),
            String::new(),
            "4.3 Test".to_string(),
            "   The following tests shall be performed:".to_string(),
            format!("   - {}", procedures),
            "   - Environmental screening per MIL-STD-810".to_string(),
            format!(
                "   - {}",
                ctx.pick_str(&["Proof pressure test", "Leak test", "Functional test", "EMI-EMC test"])
            ),
            String::new(),
            "4.4 Inspection".to_string(),
            "   Visual and dimensional inspection shall verify compliance with requirements 3.1.1, 3.1.3, and 3.2.".to_string(),
        ],
    );

    tree.push_lines(
        "Materials and Processes",
        vec![
            "5.1 Material Selection".to_string(),
            format!(
                "   Materials shall be selected based on {}.",
                ctx.pick_str(&[
                    "strength-to-weight ratio",
                    "corrosion resistance",
                    "thermal properties",
                    "electrical conductivity"
                ])
            ),
            String::new(),
            "5.2 Special Processes".to_string(),
            "   The following special processes require qualification and approval:".to_string(),
            format!(
                "   - {}",
                ctx.pick_str(&["Heat Treatment", "Welding", "Brazing", "NDT", "Surface Treatment"])
            ),
            format!(
                "   - {}",
                ctx.pick_str(&[
                    "Composite Layup",
                    "Adhesive Bonding",
                    "Precision Cleaning",
                    "Soldering",
                    "Coating"
                ])
            ),
            String::new(),
            "5.3 Process Controls".to_string(),
            "   All processes shall be performed in accordance with approved procedures.".to_string(),
            "   Process parameters shall be recorded and maintained as quality records.".to_string(),
        ],
    );

    tree.push_lines(
        "Quality Assurance",
        vec![
            "6.1 Quality System".to_string(),
            format!(
                "   All work shall be performed under a quality system compliant with {}.",
                ctx.pick_str(&["ISO 9001", "AS9100", "NASA-STD-8739", "ESA ECSS-Q-ST-20"])
            ),
            String::new(),
            "6.2 Nonconformance".to_string(),
            "   Nonconforming materials shall be identified, segregated, and dispositioned per approved procedures.".to_string(),
            "   Repair dispositions require customer approval.".to_string(),
            String::new(),
            "6.3 Traceability".to_string(),
            "   Full material and process traceability shall be maintained through all manufacturing operations.".to_string(),
            "   Each unit shall be marked with a unique serial number.".to_string(),
            String::new(),
            "6.4 Records".to_string(),
            format!(
                "   Quality records shall be maintained for a minimum of {} years.",
                ctx.range(5, 10)
            ),
        ],
    );

    tree.push_lines(
        "Testing and Acceptance",
        vec![
            "7.1 Acceptance Testing".to_string(),
            "   Each unit shall undergo the following minimum acceptance tests:".to_string(),
            format!("   - {}", ctx.pick(&theme.test_procedures)),
            "   - Dimensional inspection to critical characteristics".to_string(),
            format!(
                "   - {}",
                ctx.pick_str(&["Functional verification", "Leak check", "Proof pressure", "Electrical test"])
            ),
            String::new(),
            "7.2 Qualification Testing".to_string(),
            format!(
                "   Qualification testing shall be performed on {}.",
                ctx.pick_str(&[
                    "first article units",
                    "dedicated qualification units",
                    "selected production units"
                ])
            ),
            "   Tests shall demonstrate compliance with all performance and environmental requirements.".to_string(),
            String::new(),
            "7.3 Test Reports".to_string(),
            "   Test reports shall include:".to_string(),
            "   - Test configuration and setup".to_string(),
            "   - Test data and results".to_string(),
            "   - Pass/fail criteria".to_string(),
            "   - Non-conformances and observations".to_string(),
            "   - Authorization signatures".to_string(),
        ],
    );

    tree
}
