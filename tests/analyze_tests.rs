use crate::summary_extras::{FailingBackend, StubBackend, fetched_page, page};
use indexmap::IndexMap;
use sitedigest::analyze::{WebsiteAnalyzer, extract_website_specific, key_phrases};
use sitedigest::config::{Settings, WebsiteTypeSettings};
use sitedigest::summarize::{
    FallbackReason, SummaryGenerator, SummaryOptions, SummarySource, extractive_summary,
};
use spectral::prelude::*;

mod summary_extras;

fn extractive() -> SummaryGenerator {
    SummaryGenerator::extractive(SummaryOptions::analysis(200, 50))
}

const HOME_TEXT: &str = "Trattoria Da Mario serves Roman cuisine since 1965. \
    The kitchen is run by the third generation of the family. \
    Every morning fresh pasta is made by hand. \
    Reservations are recommended on weekends.";

#[tokio::test]
async fn empty_page_list_has_no_analysis() {
    let settings = Settings::default();
    let generator = extractive();

    let analysis = WebsiteAnalyzer::new(&settings, &generator).analyze(&[]).await;

    assert_that(&analysis).is_none();
}

#[tokio::test]
async fn single_homepage_scenario() {
    let settings = Settings::default();
    let generator = extractive();
    let pages = vec![page(
        "http://x.test/",
        "Home",
        "Welcome. Call us. Email info@x.test.",
    )];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    assert_that(&analysis.domain).is_equal_to("x.test".to_owned());
    assert_that(&analysis.total_pages).is_equal_to(1);
    assert_that(&analysis.page_types.get("homepage")).is_equal_to(Some(&1));
    assert_that(&analysis.contact_info.email).is_equal_to(Some("info@x.test".to_owned()));
    assert_that(&analysis.key_information.total_words).is_equal_to(5);
    assert_that(&analysis.key_information.largest_page.word_count()).is_equal_to(5);
    assert_that(&analysis.main_content)
        .is_equal_to("HOMEPAGE: Welcome. Call us. Email info@x.test.\n\n".to_owned());
    assert_that(&analysis.content_summary).is_equal_to(analysis.main_content.clone());
}

#[tokio::test]
async fn aggregates_follow_input_order_on_ties() {
    let settings = Settings::default();
    let generator = extractive();
    let pages = vec![
        fetched_page("http://x.test:8080/galleria", "one two three", 200, "2024-05-01T10:00:00"),
        fetched_page("http://x.test:8080/menu", "four five six", 404, "2024-05-02T09:00:00"),
        fetched_page("http://x.test:8080/blog", "seven", 200, "2024-05-02T09:00:00"),
    ];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    let key_information = &analysis.key_information;
    assert_that(&analysis.domain).is_equal_to("x.test:8080".to_owned());
    assert_that(&key_information.total_words).is_equal_to(7);
    assert_that(&key_information.largest_page.url()).is_equal_to("http://x.test:8080/galleria");
    assert_that(&key_information.last_updated).is_equal_to("2024-05-02T09:00:00".to_owned());
    assert_that(&key_information.successful_pages).is_equal_to(2);
    assert_that(&analysis.content_summary).is_equal_to("No main content found".to_owned());
    assert_that(&analysis.main_content).is_equal_to(String::new());
}

#[tokio::test]
async fn navigation_keeps_first_appearance_order() {
    let settings = Settings::default();
    let generator = extractive();
    let pages = vec![
        page("http://x.test/contatti", "", ""),
        page("http://x.test/", "", ""),
        page("http://x.test/contact-form", "", ""),
        page("http://x.test/p?id=1", "", ""),
    ];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    let navigation: Vec<&str> = analysis
        .navigation_structure
        .iter()
        .map(String::as_str)
        .collect();
    assert_that(&navigation).is_equal_to(vec!["contact", "homepage", "content"]);
    assert_that(&analysis.page_types.get("contact")).is_equal_to(Some(&2));
}

#[tokio::test]
async fn main_content_uses_first_homepage_and_about_and_is_truncated() {
    let settings = Settings::default();
    let generator = extractive();
    let long_about = "story ".repeat(300);
    let pages = vec![
        page("http://x.test/chi-siamo", "", &long_about),
        page("http://x.test/", "", "First home."),
        page("http://x.test/index.html", "", "Second home."),
    ];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    assert_that(&analysis.main_content.as_str()).starts_with("HOMEPAGE: First home.\n\nABOUT: story");
    assert_that(&analysis.main_content.chars().count()).is_equal_to(1003);
    assert_that(&analysis.main_content.as_str()).ends_with("...");
}

#[tokio::test]
async fn failing_backend_yields_extractive_summary_of_main_content() {
    let settings = Settings::default();
    let generator =
        SummaryGenerator::with_backend(Box::new(FailingBackend), SummaryOptions::analysis(200, 50));
    let pages = vec![page("http://x.test/", "Home", HOME_TEXT)];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    assert_that(&analysis.content_summary).is_equal_to(extractive_summary(&analysis.main_content));
    assert_that(&analysis.summary_source).is_equal_to(SummarySource::Extractive {
        fallback: Some(FallbackReason::Request("connection refused".to_owned())),
    });
}

#[tokio::test]
async fn long_main_content_is_truncated_before_summarizing() {
    let settings = Settings::default();
    let generator =
        SummaryGenerator::with_backend(Box::new(FailingBackend), SummaryOptions::analysis(200, 50));
    let pages = vec![page("http://x.test/", "Home", &"word ".repeat(600))];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    assert_that(&analysis.main_content.chars().count()).is_equal_to(1003);
    assert_that(&analysis.content_summary).is_equal_to(extractive_summary(&analysis.main_content));
}

#[tokio::test]
async fn backend_sees_the_truncated_main_content() {
    let settings = Settings::default();
    let backend = StubBackend::new("A site about words.");
    let inputs = backend.inputs.clone();
    let options = SummaryOptions {
        input_budget: 5000,
        ..SummaryOptions::analysis(200, 50)
    };
    let generator = SummaryGenerator::with_backend(Box::new(backend), options);
    let pages = vec![page("http://x.test/", "Home", &"word ".repeat(600))];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    let input = inputs.borrow()[0].clone();
    assert_that(&input).ends_with(&*format!("Content: {}", analysis.main_content));
}

#[tokio::test]
async fn backend_receives_website_context() {
    let settings = Settings::default();
    let backend = StubBackend::new("A Roman trattoria.");
    let inputs = backend.inputs.clone();
    let generator = SummaryGenerator::with_backend(Box::new(backend), SummaryOptions::analysis(200, 50));
    let pages = vec![page("http://x.test/", "Home", HOME_TEXT)];

    let analysis = WebsiteAnalyzer::new(&settings, &generator)
        .with_website_type("restaurant")
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    assert_that(&analysis.content_summary).is_equal_to("A Roman trattoria.".to_owned());
    let input = inputs.borrow()[0].clone();
    assert_that(&input).starts_with("Context: Website type: restaurant, Domain: x.test\n\nContent: HOMEPAGE:");
}

#[test]
fn key_phrases_rank_by_frequency_then_first_appearance() {
    let phrases = key_phrases("Pizza pasta pizza wine. Pasta PIZZA dolci wine essere essere", 3);

    assert_that(&phrases).is_equal_to(vec![
        "pizza".to_owned(),
        "pasta".to_owned(),
        "wine".to_owned(),
    ]);
}

#[test]
fn website_specific_uses_first_matching_pattern() {
    let mut content_patterns = IndexMap::new();
    content_patterns.insert(
        "opening_hours".to_owned(),
        vec![r"closed on (\w+)".to_owned(), r"open (\w+)".to_owned()],
    );
    content_patterns.insert("cuisine".to_owned(), vec!["(".to_owned(), "roman|pugliese".to_owned()]);
    let type_settings = WebsiteTypeSettings {
        priority_pages: vec![],
        key_fields: vec!["opening_hours".to_owned(), "cuisine".to_owned(), "price".to_owned()],
        content_patterns,
    };

    let extracted = extract_website_specific(
        &type_settings,
        "Open daily. Roman and Pugliese dishes, Roman wines. Open late. Open Sunday. Open now.",
    );

    assert_that(&extracted.get("opening_hours")).is_equal_to(Some(&vec![
        "daily".to_owned(),
        "late".to_owned(),
        "Sunday".to_owned(),
    ]));
    assert_that(&extracted.get("cuisine")).is_equal_to(Some(&vec![
        "Roman".to_owned(),
        "Pugliese".to_owned(),
        "Roman".to_owned(),
    ]));
    assert_that(&extracted.contains_key("price")).is_false();
}

#[tokio::test]
async fn website_specific_is_merged_only_for_a_selected_type() {
    let settings = Settings::default();
    let generator = extractive();
    let pages = vec![page("http://x.test/", "Home", "Welcome.")];

    let plain = WebsiteAnalyzer::new(&settings, &generator)
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");
    let typed = WebsiteAnalyzer::new(&settings, &generator)
        .with_website_type("generic")
        .analyze(&pages)
        .await
        .expect("Expected an analysis.");

    assert_that(&plain.key_information.website_specific).is_none();
    assert_that(&typed.key_information.website_specific).is_equal_to(Some(IndexMap::new()));
}
