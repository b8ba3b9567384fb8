//! Category grouping: base categories by keyword, emergent ones by clustering.

use rand::Rng;
use smallvec::SmallVec;
use thema_types::{BaseCategory, CategoryGroup, OpenCode, PipelineConfig, EMERGENT_PREFIX};

use crate::analyzer::ngram::top_terms;
use crate::vector::kmeans::CosineKMeans;
use crate::vector::tfidf::vectorize_texts;

/// Lowercased match keys of one base category: its label, then its synonyms.
///
/// Empty keys are skipped; an empty substring would match every code.
fn match_keys(category: &BaseCategory) -> SmallVec<[String; 4]> {
    core::iter::once(&category.label)
        .chain(&category.synonyms)
        .map(|k| k.to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Result of the rule-matching pass.
#[derive(Debug, Clone, Default)]
pub struct BaseAssignment {
    /// One group per base category, in supplied order, possibly empty.
    pub groups: Vec<CategoryGroup>,
    /// Codes that matched no base category, in input order.
    pub unassigned: Vec<OpenCode>,
}

/// Routes each code to the first base category whose label or synonym is a
/// substring of the lowercased code. First match wins; later categories are
/// not consulted.
pub fn assign_base(codes: &[OpenCode], base: &[BaseCategory]) -> BaseAssignment {
    let keys: Vec<SmallVec<[String; 4]>> = base.iter().map(match_keys).collect();
    let mut groups: Vec<CategoryGroup> = base
        .iter()
        .map(|b| CategoryGroup {
            category: b.label.clone(),
            synonyms: b.synonyms.clone(),
            codes: Vec::new(),
        })
        .collect();
    let mut unassigned = Vec::new();

    for code in codes {
        let text = code.code.to_lowercase();
        let slot = keys
            .iter()
            .position(|ks| ks.iter().any(|k| text.contains(k.as_str())));
        match slot {
            Some(i) => groups[i].codes.push(code.clone()),
            None => unassigned.push(code.clone()),
        }
    }

    BaseAssignment { groups, unassigned }
}

/// Clusters leftover codes by the TF-IDF vectors of their quotes.
///
/// `k = clamp(round(n / codes_per_cluster), 1, max_emergent_clusters)`. Each
/// non-empty cluster becomes `Emergente: <top gram>` (top gram of order up
/// to 3 over the joined quotes), or `Emergente <index + 1>` if no gram
/// qualifies. Groups come out in ascending cluster index.
pub fn discover_emergent<R>(
    unassigned: &[OpenCode],
    config: &PipelineConfig,
    rng: &mut R,
) -> Vec<CategoryGroup>
where
    R: Rng + ?Sized,
{
    if unassigned.is_empty() {
        return Vec::new();
    }

    let quotes: Vec<&str> = unassigned.iter().map(|c| c.quote.as_str()).collect();
    let model = vectorize_texts(&quotes);
    let k = config.emergent_k(unassigned.len());
    let clustering = CosineKMeans::new(k, config.kmeans_iterations).fit(&model.vectors, rng);

    tracing::debug!(unassigned = unassigned.len(), k, "clustered leftover codes");

    (0..clustering.k())
        .filter_map(|cluster| {
            let codes: Vec<OpenCode> = clustering
                .members(cluster)
                .map(|i| unassigned[i].clone())
                .collect();
            if codes.is_empty() {
                return None;
            }
            let joined = codes.iter().map(|c| c.quote.as_str()).collect::<Vec<_>>().join(" ");
            let category = match top_terms(&[joined], 3, 1).into_iter().next() {
                Some(term) => format!("{EMERGENT_PREFIX}: {term}"),
                None => format!("{EMERGENT_PREFIX} {}", cluster + 1),
            };
            Some(CategoryGroup {
                category,
                synonyms: Vec::new(),
                codes,
            })
        })
        .collect()
}

/// Partitions `codes` into base groups (supplied order, empty ones dropped)
/// followed by emergent groups.
pub fn group_categories<R>(
    codes: &[OpenCode],
    base: &[BaseCategory],
    config: &PipelineConfig,
    rng: &mut R,
) -> Vec<CategoryGroup>
where
    R: Rng + ?Sized,
{
    let BaseAssignment { groups, unassigned } = assign_base(codes, base);
    let emergent = discover_emergent(&unassigned, config, rng);

    let mut out: Vec<CategoryGroup> = groups.into_iter().filter(|g| !g.codes.is_empty()).collect();
    let base_groups = out.len();
    out.extend(emergent);

    tracing::debug!(
        codes = codes.len(),
        base_groups,
        emergent_groups = out.len() - base_groups,
        "grouped codes into categories"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn code(code: &str, quote: &str) -> OpenCode {
        OpenCode {
            doc: "a.txt".into(),
            code: code.into(),
            quote: quote.into(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn synonym_match_routes_to_base() {
        let base = [BaseCategory::new("Acceso", ["problema"])];
        let codes = [code("problema", "El problema de acceso es grave.")];
        let groups = group_categories(&codes, &base, &PipelineConfig::default(), &mut rng());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "Acceso");
        assert_eq!(groups[0].synonyms, vec!["problema"]);
        assert_eq!(groups[0].codes, codes.to_vec());
    }

    #[test]
    fn label_is_matched_case_insensitively() {
        let base = [BaseCategory::new("SALUD", Vec::<String>::new())];
        let out = assign_base(&[code("salud mental", "q")], &base);
        assert_eq!(out.groups[0].codes.len(), 1);
        assert!(out.unassigned.is_empty());
    }

    #[test]
    fn first_matching_category_wins() {
        let base = [
            BaseCategory::new("Agua", Vec::<String>::new()),
            BaseCategory::new("Potable", ["agua potable"]),
        ];
        let out = assign_base(&[code("agua potable", "q")], &base);
        assert_eq!(out.groups[0].codes.len(), 1);
        assert!(out.groups[1].codes.is_empty());
    }

    #[test]
    fn key_must_be_substring_of_code() {
        // "agua potable" contains "agua", but "agua" does not contain "agua potable"
        let base = [BaseCategory::new("Potable", ["agua potable"])];
        let out = assign_base(&[code("agua", "q")], &base);
        assert_eq!(out.unassigned.len(), 1);
    }

    #[test]
    fn empty_keys_match_nothing() {
        let base = [BaseCategory::new("", [""])];
        let out = assign_base(&[code("agua", "q")], &base);
        assert_eq!(out.unassigned.len(), 1);
    }

    #[test]
    fn empty_base_groups_are_dropped_and_order_kept() {
        let base = [
            BaseCategory::new("Salud", Vec::<String>::new()),
            BaseCategory::new("Vacio", Vec::<String>::new()),
            BaseCategory::new("Agua", Vec::<String>::new()),
        ];
        let codes = [code("agua", "q1"), code("salud", "q2")];
        let groups = group_categories(&codes, &base, &PipelineConfig::default(), &mut rng());
        let labels: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(labels, vec!["Salud", "Agua"]);
    }

    #[test]
    fn no_leftovers_skip_clustering() {
        let base = [BaseCategory::new("Agua", Vec::<String>::new())];
        let groups = group_categories(&[code("agua", "q")], &base, &PipelineConfig::default(), &mut rng());
        assert!(groups.iter().all(|g| !g.is_emergent()));
    }

    #[test]
    fn single_leftover_forms_one_emergent_group() {
        let codes = [code("escuela", "La escuela rural necesita maestros y materiales nuevos.")];
        let groups = group_categories(&codes, &[], &PipelineConfig::default(), &mut rng());
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_emergent());
        assert_eq!(groups[0].category, "Emergente: escuela");
        assert!(groups[0].synonyms.is_empty());
        assert_eq!(groups[0].codes, codes.to_vec());
    }

    #[test]
    fn emergent_without_qualifying_gram_uses_index() {
        let codes = [code("x", "Es la de el y")];
        let groups = group_categories(&codes, &[], &PipelineConfig::default(), &mut rng());
        assert_eq!(groups[0].category, "Emergente 1");
    }

    #[test]
    fn forty_five_leftovers_give_at_most_two_emergent_groups() {
        let codes: Vec<OpenCode> = (0..45)
            .map(|i| {
                let quote = if i % 2 == 0 {
                    format!("tema agua potable pozo numero{i}")
                } else {
                    format!("tema escuela maestros aula numero{i}")
                };
                code("tema", &quote)
            })
            .collect();
        let groups = group_categories(&codes, &[], &PipelineConfig::default(), &mut rng());
        assert!(!groups.is_empty() && groups.len() <= 2);
        assert_eq!(groups.iter().map(|g| g.codes.len()).sum::<usize>(), 45);
    }

    #[test]
    fn every_code_lands_in_exactly_one_group() {
        let base = [BaseCategory::new("Agua", ["pozo"])];
        let codes: Vec<OpenCode> = ["agua", "pozo", "escuela", "salud", "agua", "camino"]
            .iter()
            .enumerate()
            .map(|(i, c)| code(c, &format!("cita {i} sobre {c} en la comunidad")))
            .collect();
        let groups = group_categories(&codes, &base, &PipelineConfig::default(), &mut rng());

        let mut grouped: Vec<&OpenCode> = groups.iter().flat_map(|g| &g.codes).collect();
        assert_eq!(grouped.len(), codes.len());
        for c in &codes {
            let pos = grouped.iter().position(|g| *g == c).expect("code lost");
            grouped.swap_remove(pos);
        }
        assert!(grouped.is_empty());
    }

    #[test]
    fn clusters_with_the_same_dominant_term_share_a_label() {
        // every quote repeats "agua"; the two halves differ only in their tail
        let codes: Vec<OpenCode> = (0..40)
            .map(|i| {
                let tail = if i < 20 { "pozo seco" } else { "escuela maestros" };
                code("agua", &format!("agua agua agua {tail} caso{i}"))
            })
            .collect();
        let groups = discover_emergent(&codes, &PipelineConfig::default(), &mut rng());

        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.category == "Emergente: agua"));
        assert_eq!(groups.iter().map(|g| g.codes.len()).sum::<usize>(), 40);
    }
}
