use pure_listbreak::{
    BreakConfig, DefaultInsertBreak, Document, DocumentEditor, Node, Path, Point, Selection,
    attempt_list_break,
};
use std::time::{Duration, Instant};

/// Performance benchmark suite for list breaking
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Splitting an item in the middle of a long list
/// - Leaving a list from a trailing empty item
/// - Delegated breaks in plain paragraphs
const SMALL_LIST_ITEMS: usize = 10;
const MEDIUM_LIST_ITEMS: usize = 100;
const LARGE_LIST_ITEMS: usize = 1000;
const HUGE_LIST_ITEMS: usize = 10000;

const ITERATIONS: usize = 100;

/// Create a bulleted list with `num_items` items, optionally ending in an empty one
fn create_list_document(num_items: usize, trailing_empty: bool) -> Document {
    let mut items: Vec<Node> = (0..num_items)
        .map(|i| {
            Node::element(
                "list-item",
                vec![Node::element(
                    "paragraph",
                    vec![Node::text(format!("List item number {i} with some words"))],
                )],
            )
        })
        .collect();
    if trailing_empty {
        items.push(Node::element(
            "list-item",
            vec![Node::element("paragraph", vec![Node::text("")])],
        ));
    }
    Document::new().with_children(vec![
        Node::element("list", items),
        Node::element("paragraph", vec![Node::text("After the list")]),
    ])
}

fn create_paragraph_document(num_paragraphs: usize) -> Document {
    Document::new().with_children(
        (0..num_paragraphs)
            .map(|i| {
                Node::element(
                    "paragraph",
                    vec![Node::text(format!("Paragraph {i} of plain text"))],
                )
            })
            .collect(),
    )
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);
        println!(
            "Ops/sec:        {:.2}",
            1.0 / self.avg_duration.as_secs_f64().max(f64::EPSILON)
        );

        if self.avg_duration.as_millis() > 16 {
            println!("\n⚠️  WARNING: Average duration > 16ms (noticeable on Enter)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..10 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations as u32;
    let min_duration = durations.iter().min().copied().unwrap_or_default();
    let max_duration = durations.iter().max().copied().unwrap_or_default();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

fn sizes() -> Vec<(&'static str, usize)> {
    vec![
        ("Small (10 items)", SMALL_LIST_ITEMS),
        ("Medium (100 items)", MEDIUM_LIST_ITEMS),
        ("Large (1000 items)", LARGE_LIST_ITEMS),
        ("Huge (10000 items)", HUGE_LIST_ITEMS),
    ]
}

#[test]
fn bench_split_item_in_middle() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              SPLIT LIST ITEM BENCHMARKS                        ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let config = BreakConfig::default();
    for (name, size) in sizes() {
        let doc = create_list_document(size, false);
        let cursor = Selection::collapsed(Point::new(Path::new(vec![0, size / 2, 0, 0]), 4));
        let iterations = if size >= HUGE_LIST_ITEMS { 10 } else { ITERATIONS };

        let result = benchmark(&format!("Split item - {name}"), iterations, || {
            let outcome =
                attempt_list_break(&doc, &cursor, false, &config, &DefaultInsertBreak).unwrap();
            assert!(outcome.handled);
        });
        result.print();
    }
}

#[test]
fn bench_exit_list_from_empty_item() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              EXIT LIST BENCHMARKS                              ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let config = BreakConfig::default();
    for (name, size) in sizes() {
        let doc = create_list_document(size, true);
        let cursor = Selection::collapsed(Point::new(Path::new(vec![0, size, 0, 0]), 0));
        let iterations = if size >= HUGE_LIST_ITEMS { 10 } else { ITERATIONS };

        let result = benchmark(&format!("Exit list - {name}"), iterations, || {
            let outcome =
                attempt_list_break(&doc, &cursor, false, &config, &DefaultInsertBreak).unwrap();
            assert!(outcome.handled);
        });
        result.print();
    }
}

#[test]
fn bench_delegated_paragraph_break() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              DELEGATED BREAK BENCHMARKS                        ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    let config = BreakConfig::default();
    for (name, size) in sizes() {
        let doc = create_paragraph_document(size);
        let cursor = Selection::collapsed(Point::new(Path::new(vec![size / 2, 0]), 3));
        let iterations = if size >= HUGE_LIST_ITEMS { 10 } else { ITERATIONS };

        let result = benchmark(&format!("Delegated break - {name}"), iterations, || {
            let outcome =
                attempt_list_break(&doc, &cursor, false, &config, &DefaultInsertBreak).unwrap();
            assert!(!outcome.handled);
        });
        result.print();
    }
}

#[test]
fn bench_typing_enter_repeatedly() {
    println!("\n\n╔════════════════════════════════════════════════════════════════╗");
    println!("║              REPEATED ENTER BENCHMARKS                         ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!("\nThis simulates pressing Enter at the end of an item:");
    println!("  1. Split the item (new empty item)");
    println!("  2. Press Enter again in the empty item (leave the list)");

    for (name, size) in sizes() {
        let iterations = if size >= HUGE_LIST_ITEMS { 10 } else { ITERATIONS };
        let doc = create_list_document(size, false);
        let last = size.saturating_sub(1);
        let end = format!("List item number {last} with some words").chars().count();

        let result = benchmark(&format!("Enter twice - {name}"), iterations, || {
            let mut editor = DocumentEditor::new(doc.clone());
            editor
                .move_to(Point::new(Path::new(vec![0, last, 0, 0]), end))
                .unwrap();
            assert_eq!(editor.insert_paragraph_break(), Ok(true));
            assert_eq!(editor.insert_paragraph_break(), Ok(true));
        });
        result.print();
    }
}
