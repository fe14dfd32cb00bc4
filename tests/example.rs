use career_report::{
    composer::{ReportComposer, PLACEHOLDER},
    config::LayoutConfig,
    error::ComposeError,
    generate_pdf,
    model::{AssessmentType, CareerRecommendation, ReportModel, ScoreGroup, ScoreSection, StudentInfo},
    primitives::DrawPrimitive,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use ring::digest::{digest, SHA256};

const EQ_KEYS: [&str; 5] = ["selfAwareness", "selfRegulation", "motivation", "empathy", "socialSkills"];

fn eq_model(count: usize, score: f32) -> ReportModel {
    let mut model = ReportModel::new(AssessmentType::Eq);
    model.generated_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
    model.sections = (0..count)
        .map(|i| ScoreSection::new(EQ_KEYS[i % EQ_KEYS.len()], "", score, 10.0))
        .collect();
    model
}

fn student() -> StudentInfo {
    StudentInfo {
        name: Some("Asha Rao".to_owned()),
        class_label: Some("10".to_owned()),
        section: Some("B".to_owned()),
        school: Some("Greenfield High".to_owned()),
    }
}

fn full_model(assessment: AssessmentType) -> ReportModel {
    let mut model = ReportModel::new(assessment);
    model.generated_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
    model.student_info = Some(student());
    let riasec = ["R", "I", "A", "S", "E", "C"]
        .into_iter()
        .enumerate()
        .map(|(i, key)| ScoreSection::new(key, "", i as f32 + 3.0, 10.0).with_group(ScoreGroup::Riasec));
    let pathways = ["tech-innovator", "healthcare-helper", "business-leader"]
        .into_iter()
        .map(|key| ScoreSection::new(key, "", 6.5, 10.0).with_group(ScoreGroup::Pathways));
    let eq = EQ_KEYS
        .into_iter()
        .map(|key| ScoreSection::new(key, "", 7.0, 10.0).with_group(ScoreGroup::Eq));
    let scct = ["selfEfficacy", "outcomeExpectations", "perceivedBarriers"]
        .into_iter()
        .map(|key| ScoreSection::new(key, "", 18.0, 25.0).with_group(ScoreGroup::Scct));
    model.sections = riasec.chain(pathways).chain(eq).chain(scct).collect();
    model.recommendations = vec![
        CareerRecommendation {
            key: "engineering".to_owned(),
            title: "Engineering".to_owned(),
            match_percentage: 82.0,
            careers: vec!["Civil Engineer".to_owned(), "Robotics Technician".to_owned()],
            description: Some("Design and build the systems people rely on.".to_owned()),
        },
        CareerRecommendation {
            key: "medicine".to_owned(),
            title: "Medicine".to_owned(),
            match_percentage: 91.0,
            careers: vec!["Nurse".to_owned()],
            description: None,
        },
    ];
    model
}

#[test]
fn test_eq_scores_render_as_cards_and_radar() {
    let document = ReportComposer::default().compose(&eq_model(5, 8.0)).unwrap();

    let breakdown = document
        .pages()
        .iter()
        .find(|page| page.title() == Some("Domain Breakdown"))
        .unwrap();
    assert_eq!(breakdown.texts().filter(|t| t.text == "8/10").count(), 5);
    let fractions = breakdown
        .primitives()
        .iter()
        .filter_map(|p| match p {
            DrawPrimitive::ProgressBar(bar) => Some(bar.fraction),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(fractions, vec![0.8; 5]);

    let radar = document
        .pages()
        .iter()
        .flat_map(|page| page.primitives())
        .find_map(|p| match p {
            DrawPrimitive::Radar(radar) => Some(radar),
            _ => None,
        })
        .unwrap();
    let vertices = radar.vertices();
    assert_eq!(vertices.len(), 5);
    for vertex in vertices {
        assert!((vertex.distance(radar.center) - 0.8 * radar.radius).abs() < 1e-3);
    }
}

#[test]
fn test_student_card_is_optional() {
    let anonymous = eq_model(5, 8.0);
    let mut named = anonymous.clone();
    named.student_info = Some(student());

    let composer = ReportComposer::default();
    let anonymous = composer.compose(&anonymous).unwrap();
    let named = composer.compose(&named).unwrap();

    assert!(!anonymous.pages()[0].contains_text("Student Information"));
    assert!(named.pages()[0].contains_text("Student Information"));
    assert!(named.pages()[0].contains_text("Asha Rao"));
    assert_eq!(anonymous.pages().len(), named.pages().len());
}

#[test]
fn test_long_breakdown_continues_with_next_page_number() {
    let document = ReportComposer::default().compose(&eq_model(20, 6.0)).unwrap();

    let pages = document.pages();
    let first = pages
        .iter()
        .position(|page| page.title() == Some("Domain Breakdown"))
        .unwrap();
    let continued = &pages[first + 1];
    assert_eq!(continued.title(), Some("Domain Breakdown (continued)"));
    assert_eq!(continued.number(), pages[first].number() + 1);
    assert!(continued.contains_text(&format!("Page {}", continued.number())));
}

#[test]
fn test_unknown_key_falls_back() {
    let mut model = eq_model(0, 0.0);
    model.sections.push(ScoreSection::new("unknownDomainXYZ", "", 4.0, 10.0));

    let document = ReportComposer::default().compose(&model).unwrap();
    assert!(document.texts().any(|t| t.text == "Description not available."));
    assert!(document.texts().any(|t| t.text == "Unknown Domain XYZ"));
}

#[test]
fn test_page_numbers_are_contiguous() {
    for assessment in [
        AssessmentType::Riasec,
        AssessmentType::Eq,
        AssessmentType::Scct,
        AssessmentType::FuturePathways,
        AssessmentType::CareerVision,
    ] {
        let document = ReportComposer::default().compose(&full_model(assessment)).unwrap();
        let numbers = document.pages().iter().map(|page| page.number()).collect::<Vec<_>>();
        let expected = (1..=numbers.len() as u32).collect::<Vec<_>>();
        assert_eq!(numbers, expected, "{assessment:?}");
        assert!(document.warnings().is_empty(), "{assessment:?}: {:?}", document.warnings());
    }
}

#[test]
fn test_composition_is_idempotent() {
    let model = full_model(AssessmentType::FuturePathways);
    let composer = ReportComposer::default();
    assert_eq!(composer.compose(&model).unwrap(), composer.compose(&model).unwrap());

    let first = generate_pdf(&model, LayoutConfig::default()).unwrap();
    let second = generate_pdf(&model, LayoutConfig::default()).unwrap();
    assert_eq!(
        digest(&SHA256, &first).as_ref(),
        digest(&SHA256, &second).as_ref(),
    );
}

#[test]
fn test_model_is_not_mutated() {
    let model = full_model(AssessmentType::CareerVision);
    let before = model.clone();
    ReportComposer::default().compose(&model).unwrap();
    assert_eq!(model, before);
}

#[test]
fn test_radar_with_two_axes_degrades_to_placeholder() {
    let document = ReportComposer::default().compose(&eq_model(2, 8.0)).unwrap();

    assert_eq!(document.warnings().len(), 1);
    assert!(document.warnings()[0].starts_with("EQ Profile: "));
    assert!(document.texts().any(|t| t.text == PLACEHOLDER));
    assert!(document.texts().any(|t| t.text == "8/10"));
}

#[test]
fn test_model_json_round_trip_into_pdf() {
    let json = r#"{
        "assessmentType": "FuturePathways",
        "studentInfo": { "name": "Asha Rao", "classLabel": "10" },
        "sections": [
            { "key": "tech-innovator", "label": "Tech Innovator", "score": 8, "maxScore": 10 },
            { "key": "business-leader", "label": "Business Leader", "score": 5, "maxScore": 10 }
        ],
        "recommendations": [
            { "key": "software", "title": "Software Development", "match": 88, "careers": ["Developer"] }
        ],
        "generatedAt": "2024-05-01T09:30:00Z"
    }"#;

    let composer = ReportComposer::default();
    let document = composer.compose_json(json).unwrap();
    assert_eq!(document.title(), "Future Pathways Report");
    assert!(document.texts().any(|t| t.text == "88% match"));
    assert!(document.texts().any(|t| t.text == "Primary cluster: Tech Innovator"));

    let model = ReportModel::from_json(json).unwrap();
    let pdf = generate_pdf(&model, LayoutConfig::default()).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.7"));
    let count = format!("/Count {} ", document.pages().len());
    assert!(String::from_utf8_lossy(&pdf).contains(&count));
}

#[test]
fn test_oversized_description_flows_onto_continued_pages() {
    let mut model = ReportModel::new(AssessmentType::Scct);
    model.generated_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
    model.sections = vec![ScoreSection::new("selfEfficacy", "", 18.0, 25.0).with_description("word ".repeat(3000))];

    let config = LayoutConfig::default();
    let document = ReportComposer::new(config.clone()).compose(&model).unwrap();

    assert!(document.warnings().is_empty(), "{:?}", document.warnings());
    assert!(document.pages().len() > 2);
    assert!(document.pages()[2..]
        .iter()
        .all(|page| page.title() == Some("Career Readiness (continued)")));
    for page in document.pages() {
        let below = page
            .texts()
            .filter(|t| t.pos.y > page.height() || (t.text != config.footer_text && t.pos.y > config.body_bottom()))
            .count();
        assert_eq!(below, 0, "page {}", page.number());
    }
    let words = document
        .texts()
        .map(|t| t.text.split_whitespace().filter(|w| *w == "word").count())
        .sum::<usize>();
    assert_eq!(words, 3000);
}

#[test]
fn test_null_model_is_fatal() {
    let result = ReportComposer::default().compose_json("null");
    assert!(matches!(result, Err(ComposeError::MalformedModel(_))));
}
