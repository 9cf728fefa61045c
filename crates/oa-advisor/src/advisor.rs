//! Template-driven domain advisor.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use oa_protocol::{Domain, FarmData, PestKind, QueryParameters, Season, TreeAgeCategory};
use oa_risk::PestKnowledgeBase;

use crate::templates::{self, AdviceTemplate, Part, Section};

/// Everything a template may look at while rendering.
#[derive(Debug, Clone, Copy)]
pub struct AdviceContext<'a> {
    /// Query text, lowercased.
    pub query: &'a str,
    pub parameters: &'a QueryParameters,
    pub farm_data: Option<&'a FarmData>,
}

impl<'a> AdviceContext<'a> {
    fn farm<T>(&self, field: impl Fn(&FarmData) -> Option<T>) -> Option<T> {
        self.farm_data.and_then(field)
    }

    /// Farm-reported season first, then one named in the query.
    pub fn season(&self) -> Option<Season> {
        self.farm(|d| d.season).or(self.parameters.season)
    }

    /// Age in years from the query first, then from the farm data.
    pub fn tree_age(&self) -> Option<u32> {
        self.parameters.tree_age.or_else(|| self.farm(|d| d.tree_age))
    }

    /// `Some(true)` for young trees, `None` when age is unknown.
    pub fn is_young(&self, young_max_years: u32) -> Option<bool> {
        match self.tree_age() {
            Some(age) => Some(age <= young_max_years),
            None => self
                .parameters
                .tree_age_category
                .map(|category| category == TreeAgeCategory::Young),
        }
    }

    fn mentions(&self, triggers: &[&str]) -> bool {
        triggers.iter().any(|t| self.query.contains(t))
    }
}

/// Rendered advice for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAdvice {
    pub domain: Domain,
    /// Markdown text.
    pub advice: String,
    /// Headings of the sections that rendered, in order.
    pub sections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_pest: Option<PestKind>,
    #[serde(default)]
    pub used_fallback: bool,
}

/// One advisor for every domain, parameterized by template tables.
#[derive(Debug, Clone)]
pub struct DomainAdvisor {
    templates: BTreeMap<Domain, &'static AdviceTemplate>,
    knowledge: Option<Arc<PestKnowledgeBase>>,
}

impl Default for DomainAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainAdvisor {
    /// Advisor over the built-in templates with no knowledge base.
    pub fn new() -> Self {
        let templates = Domain::ALL
            .into_iter()
            .filter_map(|domain| templates::builtin(domain).map(|t| (domain, t)))
            .collect();
        Self {
            templates,
            knowledge: None,
        }
    }

    pub fn with_knowledge(mut self, knowledge: Arc<PestKnowledgeBase>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn with_template(mut self, template: &'static AdviceTemplate) -> Self {
        self.templates.insert(template.domain, template);
        self
    }

    pub fn covers(&self, domain: Domain) -> bool {
        self.templates.contains_key(&domain)
    }

    /// Advice for `domain`, or `None` when no template covers it.
    pub fn advise(&self, domain: Domain, ctx: &AdviceContext<'_>) -> Option<DomainAdvice> {
        let template = self.templates.get(&domain)?;
        let named_pest = self.named_pest(template, ctx);

        let mut rendered: Vec<(&str, Vec<String>)> = Vec::new();
        let mut topic_hit = false;
        let mut has_topics = false;

        for section in template.sections {
            if !section.triggers.is_empty() {
                has_topics = true;
                if !ctx.mentions(section.triggers) {
                    continue;
                }
                topic_hit = true;
            }
            let lines = self.section_lines(section, ctx, named_pest);
            if !lines.is_empty() {
                rendered.push((section.heading, lines));
            }
        }

        if has_topics
            && !topic_hit
            && let Some(section) = &template.when_no_topic
        {
            let lines = self.section_lines(section, ctx, named_pest);
            if !lines.is_empty() {
                rendered.push((section.heading, lines));
            }
        }

        if rendered.is_empty() {
            tracing::warn!(%domain, "no advice sections rendered, using fallback text");
            return Some(DomainAdvice {
                domain,
                advice: template.fallback.to_string(),
                sections: Vec::new(),
                named_pest,
                used_fallback: true,
            });
        }

        let advice = rendered
            .iter()
            .map(|(heading, lines)| render_section(heading, lines))
            .collect::<Vec<_>>()
            .join("\n\n");

        tracing::debug!(%domain, sections = rendered.len(), "domain advice rendered");

        Some(DomainAdvice {
            domain,
            advice,
            sections: rendered.iter().map(|(h, _)| h.to_string()).collect(),
            named_pest,
            used_fallback: false,
        })
    }

    fn named_pest(&self, template: &AdviceTemplate, ctx: &AdviceContext<'_>) -> Option<PestKind> {
        template
            .sections
            .iter()
            .flat_map(|s| s.parts.iter())
            .find_map(|part| match part {
                Part::NamedPest(named) => named
                    .aliases
                    .iter()
                    .find(|(_, aliases)| ctx.mentions(aliases))
                    .map(|(pest, _)| *pest),
                _ => None,
            })
    }

    fn section_lines(
        &self,
        section: &Section,
        ctx: &AdviceContext<'_>,
        named_pest: Option<PestKind>,
    ) -> Vec<String> {
        let mut lines: Vec<String> = section
            .parts
            .iter()
            .flat_map(|part| self.part_lines(part, ctx, named_pest))
            .collect();
        if lines.is_empty() {
            lines = section.otherwise.iter().map(|s| s.to_string()).collect();
        }
        lines
    }

    fn part_lines(
        &self,
        part: &Part,
        ctx: &AdviceContext<'_>,
        named_pest: Option<PestKind>,
    ) -> Vec<String> {
        match part {
            Part::Lines(lines) => lines.iter().map(|s| s.to_string()).collect(),
            Part::Seasonal(by_season) => {
                let line = match ctx.season() {
                    Some(Season::Spring) => Some(by_season.spring),
                    Some(Season::Summer) => Some(by_season.summer),
                    Some(Season::Autumn) => Some(by_season.autumn),
                    Some(Season::Winter) => Some(by_season.winter),
                    None => by_season.unknown,
                };
                line.into_iter().map(str::to_string).collect()
            }
            Part::TreeAge(schedule) => {
                let lines = match ctx.is_young(schedule.young_max_years) {
                    Some(true) => schedule.young,
                    Some(false) => schedule.mature,
                    None => schedule.unknown,
                };
                lines.iter().map(|s| s.to_string()).collect()
            }
            Part::SoilPh(ph_lines) => match ctx.farm(|d| d.soil_ph) {
                Some(ph) => {
                    let template = if ph < ph_lines.low_below {
                        ph_lines.low
                    } else if ph > ph_lines.high_above {
                        ph_lines.high
                    } else {
                        ph_lines.optimal
                    };
                    vec![template.replace("{ph}", &ph.to_string())]
                }
                None => Vec::new(),
            },
            Part::Location(template) => ctx
                .farm(|d| d.farm_location.clone())
                .filter(|loc| !loc.trim().is_empty())
                .map(|loc| vec![template.replace("{location}", &loc)])
                .unwrap_or_default(),
            Part::Temperature(t) => match ctx.farm(|d| d.temperature) {
                Some(temp) if temp > t.hot_above => vec![t.hot.to_string()],
                Some(temp) if temp < t.cold_below => vec![t.cold.to_string()],
                _ => Vec::new(),
            },
            Part::OrchardSize(s) => match ctx.farm(|d| d.orchard_size_ha) {
                Some(ha) if ha < s.small_below_ha => vec![s.small.to_string()],
                Some(ha) if ha > s.large_above_ha => vec![s.large.to_string()],
                _ => Vec::new(),
            },
            Part::NamedPest(named) => {
                let Some(pest) = named_pest else {
                    return Vec::new();
                };
                let treatments: Vec<String> = self
                    .knowledge
                    .as_deref()
                    .and_then(|kb| kb.pest(pest))
                    .map(|profile| {
                        profile
                            .organic_treatments
                            .iter()
                            .take(named.limit)
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                if treatments.is_empty() {
                    return Vec::new();
                }
                let mut lines = vec![named.lead.replace("{pest}", pest.display_name())];
                lines.extend(treatments);
                lines
            }
        }
    }
}

fn render_section(heading: &str, lines: &[String]) -> String {
    let mut out = format!("**{heading}:**");
    for line in lines {
        out.push_str("\n- ");
        out.push_str(line);
    }
    out
}
