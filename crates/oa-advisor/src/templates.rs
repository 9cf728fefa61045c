//! Built-in advice tables, one per farming domain.
//!
//! A template is an ordered list of sections. A section is shown when it has
//! no triggers or when the query contains one of its triggers; its lines come
//! from one or more [`Part`]s evaluated against the farm context. Placeholders
//! `{ph}`, `{location}` and `{pest}` are substituted at render time.

use oa_protocol::{Domain, PestKind};

#[derive(Debug)]
pub struct AdviceTemplate {
    pub domain: Domain,
    pub sections: &'static [Section],
    /// Shown when the template has triggered sections and none fired.
    pub when_no_topic: Option<Section>,
    /// Whole-domain text used when nothing renders.
    pub fallback: &'static str,
}

#[derive(Debug)]
pub struct Section {
    pub heading: &'static str,
    /// Lowercase substrings; empty means always shown.
    pub triggers: &'static [&'static str],
    pub parts: &'static [Part],
    /// Lines used when every part came up empty.
    pub otherwise: &'static [&'static str],
}

#[derive(Debug)]
pub enum Part {
    Lines(&'static [&'static str]),
    Seasonal(SeasonLines),
    TreeAge(TreeAgeLines),
    SoilPh(PhLines),
    /// Line naming the farm location.
    Location(&'static str),
    Temperature(TemperatureLines),
    OrchardSize(OrchardSizeLines),
    /// Knowledge-base treatments for a pest named in the query.
    NamedPest(NamedPestLines),
}

#[derive(Debug)]
pub struct SeasonLines {
    pub spring: &'static str,
    pub summer: &'static str,
    pub autumn: &'static str,
    pub winter: &'static str,
    pub unknown: Option<&'static str>,
}

#[derive(Debug)]
pub struct TreeAgeLines {
    /// Trees at or below this age use the young schedule.
    pub young_max_years: u32,
    pub young: &'static [&'static str],
    pub mature: &'static [&'static str],
    pub unknown: &'static [&'static str],
}

#[derive(Debug)]
pub struct PhLines {
    pub low_below: f64,
    pub high_above: f64,
    pub low: &'static str,
    pub high: &'static str,
    pub optimal: &'static str,
}

#[derive(Debug)]
pub struct TemperatureLines {
    pub hot_above: f64,
    pub cold_below: f64,
    pub hot: &'static str,
    pub cold: &'static str,
}

#[derive(Debug)]
pub struct OrchardSizeLines {
    pub small_below_ha: f64,
    pub large_above_ha: f64,
    pub small: &'static str,
    pub large: &'static str,
}

#[derive(Debug)]
pub struct NamedPestLines {
    /// Checked in order; the first pest with a matching alias wins.
    pub aliases: &'static [(PestKind, &'static [&'static str])],
    pub lead: &'static str,
    pub limit: usize,
}

const SITE_TRIGGERS: &[&str] = &["site", "location", "where", "soil", "drainage", "slope", "climate"];

pub static PLANTING: AdviceTemplate = AdviceTemplate {
    domain: Domain::Planting,
    sections: &[
        Section {
            heading: "Site Selection",
            triggers: SITE_TRIGGERS,
            parts: &[
                Part::SoilPh(PhLines {
                    low_below: 6.0,
                    high_above: 6.5,
                    low: "Your soil pH ({ph}) is slightly low. Consider lime application to raise pH to 6.0-6.5",
                    high: "Your soil pH ({ph}) is slightly high. Add organic matter to help buffer pH",
                    optimal: "Your soil pH ({ph}) is in the optimal range for macadamias",
                }),
                Part::Location("Consider local climate patterns for {location}"),
            ],
            otherwise: &[
                "Choose well-draining soil with pH 6.0-6.5",
                "Ensure protection from strong winds",
                "Select sites with good air circulation",
            ],
        },
        Section {
            heading: "Planting Timing",
            triggers: &["when", "time", "season", "month", "timing"],
            parts: &[
                Part::Seasonal(SeasonLines {
                    spring: "Excellent time for planting! Soil is warming up and growing season is ahead. Ensure adequate water supply and monitor for pests.",
                    summer: "Not ideal for planting due to heat stress. If you must plant, provide extra shade and water frequently. Consider waiting for autumn.",
                    autumn: "Good planting time with mild temperatures and upcoming winter rains. Plant early in autumn to allow establishment before winter.",
                    winter: "Generally not recommended for planting due to cold stress and slow growth. Prepare sites and plan for spring planting.",
                    unknown: None,
                }),
                Part::Lines(&[
                    "Spring (Sep-Nov) and Autumn (Mar-May) are optimal",
                    "Avoid extreme weather periods",
                ]),
            ],
            otherwise: &[],
        },
        Section {
            heading: "Variety Selection",
            triggers: &["variety", "cultivar", "type", "which", "recommend"],
            parts: &[
                Part::Lines(&[
                    "Beaumont: Vigorous upright tree with high kernel recovery",
                    "A16: Compact canopy and consistent heavy crops",
                    "A4: Thin shell and good nut-in-husk yield",
                ]),
                Part::Temperature(TemperatureLines {
                    hot_above: 26.0,
                    cold_below: 20.0,
                    hot: "Consider heat-tolerant varieties like A38",
                    cold: "Consider cold-hardy varieties like Beaumont",
                }),
            ],
            otherwise: &[],
        },
        Section {
            heading: "Tree Spacing",
            triggers: &["spacing", "distance", "apart", "density", "layout"],
            parts: &[
                Part::Lines(&[
                    "Traditional: 8m x 8m (156 trees/hectare)",
                    "Intensive: 6m x 6m (278 trees/hectare)",
                ]),
                Part::OrchardSize(OrchardSizeLines {
                    small_below_ha: 2.0,
                    large_above_ha: 10.0,
                    small: "For small orchards, consider intensive 6m x 6m spacing",
                    large: "For large orchards, traditional 8m x 8m spacing allows mechanization",
                }),
            ],
            otherwise: &[],
        },
        Section {
            heading: "Establishment Care",
            triggers: &["establish", "care", "after planting", "young trees", "maintenance"],
            parts: &[Part::Lines(&[
                "Water deeply 2-3 times per week",
                "Maintain mulch layer around trees",
                "Monitor and protect from pests",
                "Be patient - production starts in 4-7 years",
            ])],
            otherwise: &[],
        },
    ],
    when_no_topic: Some(Section {
        heading: "General Planting Principles",
        triggers: &[],
        parts: &[Part::Lines(&[
            "Choose the right site with good drainage and climate",
            "Select appropriate varieties for your conditions",
            "Plant at optimal times (spring or autumn)",
            "Use proper spacing for long-term growth",
            "Provide excellent establishment care",
        ])],
        otherwise: &[],
    }),
    fallback: "For successful macadamia planting:

**Site Selection:** Choose well-draining soil with pH 6.0-6.5, protection from winds, and good air circulation.

**Timing:** Plant in spring (Sep-Nov) or autumn (Mar-May) for best establishment.

**Varieties:** Popular choices include Beaumont, A4, A16, and A38. Choose based on your climate and market needs.

**Spacing:** Traditional 8m x 8m spacing works well for most situations.",
};

pub static PEST_MANAGEMENT: AdviceTemplate = AdviceTemplate {
    domain: Domain::PestManagement,
    sections: &[
        Section {
            heading: "Integrated Pest Management Approach",
            triggers: &[],
            parts: &[Part::Lines(&[
                "Prevention is better than treatment",
                "Regular monitoring and early detection",
                "Use of beneficial insects and natural enemies",
            ])],
            otherwise: &[],
        },
        Section {
            heading: "Specific Pest Management",
            triggers: &[],
            parts: &[Part::NamedPest(NamedPestLines {
                aliases: &[
                    (PestKind::MacadamiaNutBorer, &["borer", "nut borer", "cryptophlebia"]),
                    (PestKind::StinkBugs, &["stink bug", "shield bug", "nezara"]),
                    (PestKind::ScaleInsects, &["scale", "scale insect", "honeydew"]),
                ],
                lead: "Recommended treatments for {pest}:",
                limit: 3,
            })],
            otherwise: &[],
        },
        Section {
            heading: "Seasonal Considerations",
            triggers: &[],
            parts: &[Part::Seasonal(SeasonLines {
                spring: "Increase monitoring as pest activity increases with warming weather",
                summer: "Peak pest season - intensive monitoring and treatment may be needed",
                autumn: "Monitor harvest areas and maintain sanitation",
                winter: "Reduced pest activity - focus on orchard cleanup and planning",
                unknown: Some("Monitor pest activity according to seasonal patterns"),
            })],
            otherwise: &[],
        },
        Section {
            heading: "Monitoring Schedule",
            triggers: &[],
            parts: &[Part::Lines(&[
                "Weekly during growing season, bi-weekly during dormant season",
                "Focus on leaves, nuts, and beneficial insects",
            ])],
            otherwise: &[],
        },
    ],
    when_no_topic: None,
    fallback: "**Organic Pest Management for Macadamias:**

- **Prevention First:** Maintain healthy trees through proper nutrition and care
- **Regular Monitoring:** Weekly inspections during growing season
- **Beneficial Insects:** Encourage natural predators with diverse plantings
- **Organic Treatments:** Use neem oil, insecticidal soap, or Bt when needed
- **Sanitation:** Remove fallen nuts and debris promptly

Focus on building a balanced ecosystem that naturally controls pests.",
};

pub static FERTILIZATION: AdviceTemplate = AdviceTemplate {
    domain: Domain::Fertilization,
    sections: &[
        Section {
            heading: "Organic Fertilization Program",
            triggers: &[],
            parts: &[Part::TreeAge(TreeAgeLines {
                young_max_years: 3,
                young: &[
                    "For young trees (1-3 years):",
                    "Spring: 10-15kg compost + 0.5kg blood meal per tree",
                    "Summer: Monthly fish emulsion (1:10 dilution)",
                    "Autumn: 5-10kg aged manure per tree",
                ],
                mature: &[
                    "For mature trees (4+ years):",
                    "Spring: 20-30kg compost + 1-2kg blood meal per tree",
                    "Summer: Monthly fish emulsion + foliar seaweed spray",
                    "Autumn: 15-25kg aged manure + rock phosphate",
                ],
                unknown: &[
                    "Apply compost in spring and autumn",
                    "Use organic fertilizers based on soil test results",
                    "Maintain soil pH between 6.0-6.5",
                ],
            })],
            otherwise: &[],
        },
        Section {
            heading: "Soil-Specific Recommendations",
            triggers: &[],
            parts: &[Part::SoilPh(PhLines {
                low_below: 6.0,
                high_above: 6.5,
                low: "Soil pH ({ph}) is low - add lime to raise to 6.0-6.5",
                high: "Soil pH ({ph}) is high - add sulfur or organic matter",
                optimal: "Soil pH ({ph}) is optimal for macadamias",
            })],
            otherwise: &[],
        },
        Section {
            heading: "Key Organic Fertilizers",
            triggers: &[],
            parts: &[Part::Lines(&[
                "Compost: Improves soil structure and provides balanced nutrition",
                "Blood meal: Quick nitrogen source for growth",
                "Kelp meal: Trace elements and growth hormones",
                "Fish emulsion: Liquid fertilizer for regular feeding",
            ])],
            otherwise: &[],
        },
    ],
    when_no_topic: None,
    fallback: "**Organic Fertilization for Macadamias:**

- **Soil Testing:** Test annually to determine specific nutrient needs
- **Compost:** Apply 10-30kg per tree in spring and autumn
- **Organic Fertilizers:** Use blood meal, bone meal, and kelp meal
- **pH Management:** Maintain soil pH between 6.0-6.5
- **Foliar Feeding:** Monthly fish emulsion during growing season

Adjust amounts based on tree age and soil test results.",
};

pub static HARVESTING: AdviceTemplate = AdviceTemplate {
    domain: Domain::Harvesting,
    sections: &[
        Section {
            heading: "Harvest Timing & Maturity",
            triggers: &[],
            parts: &[Part::Lines(&[
                "Wait for nuts to fall naturally from trees",
                "Husk should split open and nut falls freely",
                "Perform float test: mature nuts sink in water",
                "Collect nuts within 2-3 days of falling",
            ])],
            otherwise: &[],
        },
        Section {
            heading: "Harvest Methods",
            triggers: &[],
            parts: &[Part::Lines(&[
                "Ground collection: Most common method",
                "Tree shaking: For controlled timing",
                "Hand picking: Highest quality but labor intensive",
            ])],
            otherwise: &[],
        },
        Section {
            heading: "Post-Harvest Handling",
            triggers: &[],
            parts: &[Part::Lines(&[
                "Remove husks within 24 hours",
                "Wash nuts to remove debris",
                "Dry to 1.5-3.5% moisture content",
                "Store in cool, dry, ventilated conditions",
            ])],
            otherwise: &[],
        },
        Section {
            heading: "Current Season",
            triggers: &[],
            parts: &[Part::Seasonal(SeasonLines {
                spring: "Post-harvest - focus on storage and processing",
                summer: "Pre-harvest - monitor nut development",
                autumn: "Prime harvest season - monitor daily for nut drop",
                winter: "Late harvest period - focus on quality assessment",
                unknown: Some("Monitor nuts for natural drop and maturity signs"),
            })],
            otherwise: &[],
        },
    ],
    when_no_topic: None,
    fallback: "**Macadamia Harvesting Guide:**

- **Timing:** Wait for natural nut drop when husks split open
- **Collection:** Gather nuts within 2-3 days to maintain quality
- **Testing:** Use float test - mature nuts sink in water
- **Processing:** Remove husks promptly and dry to proper moisture
- **Storage:** Keep in cool, dry conditions with good ventilation

Quality handling from tree to storage is crucial for premium nuts.",
};

pub static CERTIFICATION: AdviceTemplate = AdviceTemplate {
    domain: Domain::Certification,
    sections: &[
        Section {
            heading: "Organic Certification Process",
            triggers: &[],
            parts: &[Part::Lines(&[
                "3-year transition period required",
                "Stop all prohibited substances immediately",
                "Begin detailed record keeping now",
                "Choose accredited certification body",
                "Undergo annual inspections",
            ])],
            otherwise: &[],
        },
        Section {
            heading: "Key Requirements",
            triggers: &[],
            parts: &[Part::Lines(&[
                "No synthetic fertilizers or pesticides",
                "Use only approved organic inputs",
                "Maintain buffer zones from conventional farms",
                "Keep detailed production records",
            ])],
            otherwise: &[],
        },
        Section {
            heading: "Record Keeping Essentials",
            triggers: &[],
            parts: &[Part::Lines(&[
                "All input purchases and applications",
                "Field maps and crop rotation plans",
                "Harvest dates and quantities",
                "Storage and handling procedures",
            ])],
            otherwise: &[],
        },
        Section {
            heading: "Timeline",
            triggers: &[],
            parts: &[Part::Lines(&[
                "Start transition immediately",
                "Apply for certification in year 2",
                "Full certification after 3 years",
                "Annual renewals required",
            ])],
            otherwise: &[],
        },
    ],
    when_no_topic: None,
    fallback: "**Organic Certification for Macadamias:**

- **Transition Period:** 3 years minimum without prohibited substances
- **Record Keeping:** Document everything - inputs, practices, harvests
- **Approved Inputs:** Use only OMRI-listed or certifier-approved materials
- **Inspection:** Annual on-farm inspections required
- **Certification Body:** Choose accredited certifier for your region

Start record keeping immediately, even before formal certification begins.",
};

/// Built-in template for a domain. General queries have none.
pub fn builtin(domain: Domain) -> Option<&'static AdviceTemplate> {
    match domain {
        Domain::Planting => Some(&PLANTING),
        Domain::PestManagement => Some(&PEST_MANAGEMENT),
        Domain::Fertilization => Some(&FERTILIZATION),
        Domain::Harvesting => Some(&HARVESTING),
        Domain::Certification => Some(&CERTIFICATION),
        Domain::General => None,
    }
}
