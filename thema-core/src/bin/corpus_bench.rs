//! Corpus Benchmarking Tool
//!
//! Times each stage of the analysis over a transcript dump and reports what
//! the stage produced: sentences split, tokens kept, distinct grams, open
//! codes and categories.
//!
//! The input file is cut into transcripts at blank lines, so a concatenation
//! of interview files separated by empty lines behaves like a corpus folder.
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/corpus_bench /path/to/transcripts.txt [runs]
//! ```
//!
//! ## Example Output
//!
//! ```text
//! Corpus      : 12.40 MiB, 1_842 transcripts
//!
//! stage           median        best      MiB/s           output          per sec
//! ---------------------------------------------------------------------------------
//! normalize      38.21 ms    37.90 ms     324.5     12_998_114 chars  340_175_700
//! sentences       9.87 ms     9.61 ms    1256.3        201_377 sent.   20_402_938
//! tokenize       61.02 ms    60.44 ms     203.2      1_401_213 tokens  22_963_183
//! ngrams        181.50 ms   179.02 ms      68.3        702_310 grams    3_869_476
//! open coding   402.11 ms   398.73 ms      30.8         77_054 codes      191_623
//! pipeline      655.84 ms   650.12 ms      18.9             17 cats            25
//! ```
//!
//! Build with `--release`; the first run of every stage is discarded.

use std::env;
use std::fs;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thema_core::analyzer::ngram::NgramCounter;
use thema_core::analyzer::normalizer::TextNormalizer;
use thema_core::analyzer::sentence::split_sentences;
use thema_core::analyzer::tokenizer::Tokenizer;
use thema_core::coding::open_coding;
use thema_core::ThematicPipeline;
use thema_types::{Document, PipelineConfig};

const DEFAULT_RUNS: usize = 5;
const SEED: u64 = 0x7e3a;

/// Wall-clock samples of one stage.
struct Timing {
    median: Duration,
    best: Duration,
}

/// One result row: stage name, timing, and how much it produced.
struct Row {
    stage: &'static str,
    timing: Timing,
    output: u64,
    unit: &'static str,
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let Some(path) = args.get(1) else {
        eprintln!("Usage: corpus_bench <path> [runs]");
        std::process::exit(1);
    };
    let runs = args
        .get(2)
        .and_then(|r| r.parse::<usize>().ok())
        .filter(|&r| r > 0)
        .unwrap_or(DEFAULT_RUNS);

    let input = fs::read_to_string(path)?;
    let docs = split_transcripts(&input);
    let bytes = input.len();

    println!(
        "Corpus      : {:.2} MiB, {} transcripts\n",
        mib(bytes),
        grouped(docs.len() as u64)
    );

    let config = PipelineConfig::default();
    let normalizer = TextNormalizer::new();
    let tokenizer = Tokenizer::new();
    let mut buf = String::with_capacity(bytes);

    let rows = [
        stage("normalize", "chars", runs, || {
            docs.iter()
                .map(|d| {
                    normalizer.normalize_into(&d.text, &mut buf);
                    buf.chars().count() as u64
                })
                .sum()
        }),
        stage("sentences", "sent.", runs, || {
            docs.iter().map(|d| split_sentences(&d.text).len() as u64).sum()
        }),
        stage("tokenize", "tokens", runs, || {
            let mut kept = 0u64;
            for d in &docs {
                normalizer.normalize_into(&d.text, &mut buf);
                tokenizer.tokenize(&buf, |_| kept += 1);
            }
            kept
        }),
        stage("ngrams", "grams", runs, || {
            let mut counter = NgramCounter::new();
            for d in &docs {
                counter.count_text(&d.text, config.vocabulary_order);
            }
            counter.len() as u64
        }),
        stage("open coding", "codes", runs, || {
            open_coding(&docs, &config).len() as u64
        }),
        stage("pipeline", "cats", runs, || {
            let mut rng = StdRng::seed_from_u64(SEED);
            let analysis = ThematicPipeline::with_config(config).run_with_rng(&docs, &[], &mut rng);
            analysis.grouped.len() as u64
        }),
    ];

    print_table(&rows, bytes);
    Ok(())
}

/// Cuts `input` at blank lines into numbered transcripts.
fn split_transcripts(input: &str) -> Vec<Document> {
    let mut docs = Vec::new();
    let mut current = String::new();

    for line in input.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !current.is_empty() {
                let id = docs.len() as u32;
                docs.push(Document::new(id, format!("t{id}.txt"), std::mem::take(&mut current)));
            }
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }

    docs
}

/// Runs `f` once unmeasured, then `runs` times; `f` returns its output size.
fn stage<F>(name: &'static str, unit: &'static str, runs: usize, mut f: F) -> Row
where
    F: FnMut() -> u64,
{
    std::hint::black_box(f());

    let mut samples = Vec::with_capacity(runs);
    let mut output = 0;
    for _ in 0..runs {
        let start = Instant::now();
        output = std::hint::black_box(f());
        samples.push(start.elapsed());
    }
    samples.sort_unstable();

    Row {
        stage: name,
        timing: Timing {
            median: samples[samples.len() / 2],
            best: samples[0],
        },
        output,
        unit,
    }
}

fn print_table(rows: &[Row], bytes: usize) {
    println!(
        "{:<12} {:>9} {:>11} {:>10} {:>16} {:>16}",
        "stage", "median", "best", "MiB/s", "output", "per sec"
    );
    println!("{}", "-".repeat(81));

    for row in rows {
        let secs = row.timing.median.as_secs_f64().max(f64::EPSILON);
        println!(
            "{:<12} {:>6.2} ms {:>8.2} ms {:>10.1} {:>10} {:<6} {:>10}",
            row.stage,
            millis(row.timing.median),
            millis(row.timing.best),
            mib(bytes) / secs,
            grouped(row.output),
            row.unit,
            grouped((row.output as f64 / secs) as u64),
        );
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

fn mib(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// `1234567` → `1_234_567`.
fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut parts: Vec<&str> = Vec::new();
    if head > 0 {
        parts.push(&digits[..head]);
    }
    parts.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .filter_map(|c| std::str::from_utf8(c).ok()),
    );
    parts.join("_")
}
