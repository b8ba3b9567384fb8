//! End-to-end runs of the analysis pipeline.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashSet;

use thema_core::coding::group_categories;
use thema_core::{network_data, sentiment_tally, ThematicPipeline};
use thema_types::{Analysis, BaseCategory, Document, DocumentMeta, OpenCode, PipelineConfig};

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn run(docs: &[Document], base: &[BaseCategory], config: PipelineConfig) -> Analysis {
    ThematicPipeline::with_config(config).run_with_rng(docs, base, &mut rng())
}

fn assert_partition(analysis: &Analysis) {
    let mut grouped: Vec<&OpenCode> = analysis.grouped.iter().flat_map(|g| &g.codes).collect();
    assert_eq!(grouped.len(), analysis.open_codes.len());
    for code in &analysis.open_codes {
        let pos = grouped
            .iter()
            .position(|g| *g == code)
            .unwrap_or_else(|| panic!("code missing from groups: {code:?}"));
        grouped.swap_remove(pos);
    }
}

const ACCESS_DOC: &str = "el problema de acceso es grave.\nel problema de acceso limita oportunidades.";

#[test]
fn base_category_captures_matching_code() {
    let docs = [Document::new(1, "entrevista.txt", ACCESS_DOC)];
    let base = [BaseCategory::new("Acceso", ["problema"])];
    // both sentences keep fewer than six tokens, so lower the threshold
    let config = PipelineConfig {
        min_sentence_tokens: 3,
        ..PipelineConfig::default()
    };

    let analysis = run(&docs, &base, config);

    assert_eq!(analysis.open_codes.len(), 2);
    assert!(analysis.open_codes.iter().all(|c| c.code.contains("problema")));
    assert_eq!(analysis.grouped.len(), 1);
    assert_eq!(analysis.grouped[0].category, "Acceso");
    assert!(!analysis.grouped[0].is_emergent());
    assert_eq!(analysis.grouped[0].codes, analysis.open_codes);
    assert_eq!(analysis.themes[0].theme, "Acceso");
}

#[test]
fn short_sentences_yield_no_codes_under_defaults() {
    let docs = [Document::new(1, "entrevista.txt", ACCESS_DOC)];
    let base = [BaseCategory::new("Acceso", ["problema"])];
    let analysis = run(&docs, &base, PipelineConfig::default());
    assert!(analysis.open_codes.is_empty());
    assert!(analysis.grouped.is_empty());
    assert!(analysis.themes.is_empty());
}

#[test]
fn empty_corpus_is_total() {
    let base = [BaseCategory::new("Acceso", ["problema"])];
    let analysis = run(&[], &base, PipelineConfig::default());
    assert!(analysis.docs.is_empty());
    assert!(analysis.familiarization.is_empty());
    assert!(analysis.open_codes.is_empty());
    assert!(analysis.grouped.is_empty());
    assert!(analysis.themes.is_empty());
    assert!(analysis.comparative.is_empty());
    assert_eq!(analysis.stats().to_string(), "0 docs, 0 codes, 0 categories (0 emergent)");
}

#[test]
fn forty_five_leftovers_cluster_into_at_most_two_groups() {
    let config = PipelineConfig::default();
    assert_eq!(config.emergent_k(45), 2);

    let codes: Vec<OpenCode> = (0..45)
        .map(|i| OpenCode {
            doc: format!("e{}.txt", i % 5),
            code: "comunidad".into(),
            quote: if i % 3 == 0 {
                format!("La comunidad pide caminos y transporte, caso {i}.")
            } else {
                format!("La comunidad necesita agua potable y pozos, caso {i}.")
            },
        })
        .collect();

    let groups = group_categories(&codes, &[], &config, &mut rng());
    assert!(!groups.is_empty() && groups.len() <= 2);
    assert!(groups.iter().all(|g| g.is_emergent()));
    assert_eq!(groups.iter().map(|g| g.codes.len()).sum::<usize>(), 45);
}

#[test]
fn single_leftover_becomes_one_emergent_category() {
    let text = "La escuela rural necesita maestros comprometidos y materiales nuevos.";
    let docs = [Document::new(1, "e1.txt", text)];
    let analysis = run(&docs, &[], PipelineConfig::default());

    assert_eq!(analysis.open_codes.len(), 1);
    assert_eq!(analysis.grouped.len(), 1);
    let group = &analysis.grouped[0];
    assert!(group.is_emergent());
    assert_eq!(group.codes, analysis.open_codes);
    assert_eq!(group.category, "Emergente: escuela");
}

#[test]
fn comparative_and_derived_views_over_metadata() {
    let meta = |country: &str| DocumentMeta {
        country: Some(country.into()),
        ..Default::default()
    };
    let docs = [
        Document::new(
            1,
            "peru.txt",
            "Participante: Las familias cargan agua desde pozos lejanos cada mañana. \
             El apoyo municipal no es suficiente para mantener los pozos.",
        )
        .with_meta(meta("Perú")),
        Document::new(
            2,
            "chile.txt",
            "Participante: La escuela rural tiene problemas graves de transporte escolar. \
             Los maestros viajan horas por caminos rurales sin pavimento.",
        )
        .with_meta(meta("Chile")),
    ];
    let analysis = run(&docs, &[], PipelineConfig::default());

    assert_eq!(analysis.comparative.len(), 1);
    let finding = &analysis.comparative[0];
    assert_eq!(finding.dimension, "Por país");
    assert!(finding.findings.starts_with("Perú: "));
    assert!(finding.findings.contains(" — Chile: "));

    assert!(analysis.familiarization[0].summary.contains("Interlocutores: participante."));
    assert!(analysis.familiarization[0].summary.ends_with("País: Perú"));

    let tally = sentiment_tally(&analysis.docs);
    assert_eq!(tally.total, 4);
    assert_eq!(tally.positive + tally.neutral + tally.negative, tally.total);

    let net = network_data(&analysis);
    assert_eq!(net.nodes[0].id, "EJE: Central");
    let quotes = net.nodes.iter().filter(|n| n.id.starts_with("CITA:")).count();
    assert_eq!(quotes, analysis.open_codes.len());
}

#[test]
fn analysis_json_uses_documented_keys() {
    let docs = [Document::new(1, "e1.txt", ACCESS_DOC)];
    let analysis = run(&docs, &[], PipelineConfig::default());
    let json = serde_json::to_value(&analysis).unwrap();
    for key in ["docs", "familiarization", "openCodes", "grouped", "themes", "comparative"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn rename_after_run_keeps_groups_and_themes_aligned() {
    let text = "La escuela rural necesita maestros comprometidos y materiales nuevos.";
    let mut analysis = run(&[Document::new(1, "e1.txt", text)], &[], PipelineConfig::default());
    let old = analysis.grouped[0].category.clone();

    assert_eq!(analysis.rename_category(&old, "Educación rural"), Ok(2));
    assert_eq!(analysis.grouped[0].category, "Educación rural");
    assert_eq!(analysis.themes[0].theme, "Educación rural");
}

const WORDS: &[&str] = &[
    "agua", "potable", "escuela", "rural", "camino", "salud", "problema", "acceso",
    "comunidad", "maestros", "pozos", "transporte", "familias", "apoyo", "lluvias",
];

fn sentence() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(WORDS), 4..12)
        .prop_map(|w| format!("{}.", w.join(" ")))
}

fn document() -> impl Strategy<Value = String> {
    proptest::collection::vec(sentence(), 1..8).prop_map(|s| s.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn grouping_partitions_deduplicated_codes(
        texts in proptest::collection::vec(document(), 0..6),
        seed in any::<u64>(),
    ) {
        let docs: Vec<Document> = texts
            .into_iter()
            .enumerate()
            .map(|(i, t)| Document::new(i as u32, format!("d{i}.txt"), t))
            .collect();
        let base = [BaseCategory::new("Acceso", ["problema"]), BaseCategory::new("Salud", ["pozos"])];
        let analysis = ThematicPipeline::new()
            .run_with_rng(&docs, &base, &mut StdRng::seed_from_u64(seed));

        assert_partition(&analysis);

        let mut keys = FxHashSet::default();
        for c in &analysis.open_codes {
            let prefix: String = c.quote.chars().take(40).collect();
            prop_assert!(keys.insert((c.doc.clone(), c.code.clone(), prefix)));
        }

        let labels: Vec<_> = analysis.grouped.iter().map(|g| &g.category).collect();
        let themes: Vec<_> = analysis.themes.iter().map(|t| &t.theme).collect();
        prop_assert_eq!(labels, themes);
        prop_assert!(analysis.grouped.iter().filter(|g| g.is_emergent()).count() <= 5);
    }
}
