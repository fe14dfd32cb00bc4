//! Static lookup tables: section descriptions, canonical schemas and subject
//! suggestions per career cluster.

use crate::model::{AssessmentType, ScoreGroup, SectionSchema};

pub fn description(key: &str) -> Option<&'static str> {
    let description = match key {
        // RIASEC
        "R" => "Realistic people enjoy hands-on work with tools, machines, plants or animals and like to see tangible results.",
        "I" => "Investigative people are curious thinkers who like to observe, analyse and solve complex problems.",
        "A" => "Artistic people value self-expression and enjoy creating original work in unstructured settings.",
        "S" => "Social people like helping, teaching and caring for others and work well in teams.",
        "E" => "Enterprising people enjoy leading, persuading and taking initiative to reach goals.",
        "C" => "Conventional people prefer clear structure, careful organisation and working with data and detail.",
        // EQ
        "selfAwareness" => "Recognising your own emotions as they happen and understanding how they influence your thoughts and actions.",
        "selfRegulation" => "Managing impulses and emotions, staying calm under pressure and adapting to change.",
        "motivation" => "Pursuing goals with energy and persistence, driven by inner satisfaction rather than outside reward.",
        "empathy" => "Sensing what others feel, seeing things from their perspective and responding with care.",
        "socialSkills" => "Building relationships, communicating clearly, resolving conflict and working well with others.",
        // SCCT
        "selfEfficacy" => "Confidence in your ability to carry out the tasks needed to succeed in your chosen career path.",
        "outcomeExpectations" => "What you expect to gain from pursuing a career, such as satisfaction, income and recognition.",
        "careerInterests" => "How strongly your interests point towards particular fields of work.",
        "careerGoals" => "How clearly you have set career goals and planned the steps towards them.",
        "perceivedBarriers" => "How free you feel from obstacles such as cost, access or discouragement. Higher scores mean fewer perceived barriers.",
        // Future Pathways
        "tech-innovator" => "Builds and improves technology, from software and electronics to data and automation.",
        "creative-storyteller" => "Communicates ideas through design, media, writing and performance.",
        "healthcare-helper" => "Supports the health and wellbeing of people through care, treatment and research.",
        "business-leader" => "Organises people and resources to start, run and grow enterprises.",
        "science-explorer" => "Investigates the natural world through experiments, fieldwork and analysis.",
        "community-builder" => "Strengthens communities through education, public service and advocacy.",
        _ => return None,
    };
    Some(description)
}

/// Suggested school subjects for a primary cluster or RIASEC type.
pub fn subjects(cluster: &str) -> Option<&'static [&'static str]> {
    let subjects: &'static [&'static str] = match cluster {
        "R" => &["Physics", "Engineering Graphics", "Agriculture", "Physical Education"],
        "I" => &["Mathematics", "Physics", "Chemistry", "Biology", "Computer Science"],
        "A" => &["Fine Arts", "Music", "Literature", "Media Studies"],
        "S" => &["Psychology", "Sociology", "Languages", "Health Education"],
        "E" => &["Business Studies", "Economics", "Entrepreneurship", "Public Speaking"],
        "C" => &["Accountancy", "Mathematics", "Information Practices", "Economics"],
        "tech-innovator" => &["Computer Science", "Mathematics", "Physics", "Electronics"],
        "creative-storyteller" => &["Literature", "Fine Arts", "Media Studies", "Design"],
        "healthcare-helper" => &["Biology", "Chemistry", "Psychology", "Physical Education"],
        "business-leader" => &["Business Studies", "Economics", "Accountancy", "Mathematics"],
        "science-explorer" => &["Physics", "Chemistry", "Biology", "Geography"],
        "community-builder" => &["Political Science", "Sociology", "History", "Languages"],
        _ => return None,
    };
    Some(subjects)
}

/// Canonical section layout of each assessment.
pub fn schema(assessment: AssessmentType) -> Vec<SectionSchema> {
    match assessment {
        AssessmentType::Riasec => riasec(),
        AssessmentType::Eq => eq(),
        AssessmentType::Scct => scct(),
        AssessmentType::FuturePathways => future_pathways(),
        AssessmentType::CareerVision => [riasec(), future_pathways(), eq()].concat(),
    }
}

fn riasec() -> Vec<SectionSchema> {
    [
        ("R", "Realistic"),
        ("I", "Investigative"),
        ("A", "Artistic"),
        ("S", "Social"),
        ("E", "Enterprising"),
        ("C", "Conventional"),
    ]
    .into_iter()
    .map(|(key, label)| SectionSchema::new(key, label, 10.0, ScoreGroup::Riasec))
    .collect()
}

fn eq() -> Vec<SectionSchema> {
    [
        ("selfAwareness", "Self-Awareness"),
        ("selfRegulation", "Self-Regulation"),
        ("motivation", "Motivation"),
        ("empathy", "Empathy"),
        ("socialSkills", "Social Skills"),
    ]
    .into_iter()
    .map(|(key, label)| SectionSchema::new(key, label, 10.0, ScoreGroup::Eq))
    .collect()
}

fn scct() -> Vec<SectionSchema> {
    vec![
        SectionSchema::likert("selfEfficacy", "Self-Efficacy", 6, ScoreGroup::Scct),
        SectionSchema::likert("outcomeExpectations", "Outcome Expectations", 5, ScoreGroup::Scct),
        SectionSchema::likert("careerInterests", "Career Interests", 5, ScoreGroup::Scct),
        SectionSchema::likert("careerGoals", "Career Goals", 4, ScoreGroup::Scct),
        SectionSchema::likert("perceivedBarriers", "Perceived Barriers", 5, ScoreGroup::Scct).inverted(),
    ]
}

fn future_pathways() -> Vec<SectionSchema> {
    [
        ("tech-innovator", "Tech Innovator"),
        ("creative-storyteller", "Creative Storyteller"),
        ("healthcare-helper", "Healthcare Helper"),
        ("business-leader", "Business Leader"),
        ("science-explorer", "Science Explorer"),
        ("community-builder", "Community Builder"),
    ]
    .into_iter()
    .map(|(key, label)| SectionSchema::new(key, label, 10.0, ScoreGroup::Pathways))
    .collect()
}
