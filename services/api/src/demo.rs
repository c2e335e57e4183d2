use crate::infra::{parse_date, report_instant, InMemoryActivityLog};
use chrono::{NaiveDate, Utc};
use clap::Args;
use pathways::career::{CareerQuestion, QuestionKind, StreamRecommendation};
use pathways::error::AppError;
use pathways::progress::{AchievementConfig, ProgressReport};
use pathways::quiz::{
    sample_questions, AnswerLetter, AnswerSheet, AssessmentService, Difficulty, Question,
    ReferenceData, SamplePlan, ScoreBand, ScoringConfig,
};
use pathways::store::DataStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ProgressReportArgs {
    /// User whose history to aggregate
    #[arg(long)]
    pub(crate) user_id: String,
    /// Data directory holding the CSV collections (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Report date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for deterministic question sampling
    #[arg(long, default_value_t = 7)]
    pub(crate) seed: u64,
    /// User id recorded for the demo attempts
    #[arg(long, default_value = "demo-user")]
    pub(crate) user: String,
}

pub(crate) fn run_progress_report(args: ProgressReportArgs) -> Result<(), AppError> {
    let ProgressReportArgs {
        user_id,
        data_dir,
        today,
    } = args;

    let dir = match data_dir {
        Some(dir) => dir,
        None => pathways::config::AppConfig::load()?.data.dir,
    };
    let store = DataStore::new(dir);
    let records = store.activity_for_user(&user_id);
    let now = match today {
        Some(date) => report_instant(date),
        None => Utc::now(),
    };

    let report = pathways::progress::report(&records, now, &AchievementConfig::default());
    render_progress_report(&user_id, &report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { seed, user } = args;

    let reference = Arc::new(demo_reference_data());
    let log = InMemoryActivityLog::default();
    let service = AssessmentService::new(
        Arc::new(log.clone()),
        reference.clone(),
        ScoringConfig::default(),
        AchievementConfig::default(),
    );

    println!("Learning pathways demo (seed {seed})");

    // Cognitive assessment: deterministic sample, answer most questions
    // correctly to land in a realistic band.
    let mut rng = StdRng::seed_from_u64(seed);
    let questions = sample_questions(&reference.questions, &SamplePlan::standard(), &mut rng);
    let mut sheet = AnswerSheet::new();
    for (index, question) in questions.iter().enumerate() {
        let letter = if index % 4 == 3 {
            wrong_answer(question.correct_answer)
        } else {
            question.correct_answer
        };
        sheet.record(index, letter);
    }

    let elapsed = (questions.len() as u32) * 25;
    let outcome = service.submit_iq(&user, &sheet, &questions, Some(elapsed), Utc::now())?;

    println!("\nCognitive assessment");
    println!(
        "  {}/{} correct ({:.1}% accuracy)",
        outcome.correct, outcome.total, outcome.accuracy
    );
    println!(
        "  composite score {:.0} ({})",
        outcome.composite,
        ScoreBand::for_composite(outcome.composite).label()
    );

    // Career quiz: strong technology leaning.
    let answers = [(0, "d"), (1, "c"), (2, "b"), (3, "a"), (4, "d")]
        .into_iter()
        .map(|(index, letter)| (index, letter.to_string()))
        .collect();
    let career = service.submit_career(&user, &answers, Utc::now())?;

    println!("\nCareer affinity");
    for field in career.profile.entries() {
        println!(
            "  {:<16} {:.1}/4.0 across {} question(s)",
            field.field,
            field.average(),
            field.count
        );
    }

    println!("\nRecommended streams");
    if career.recommended.is_empty() {
        println!("  (no matching streams)");
    }
    for ranked in &career.recommended {
        println!(
            "  {:<24} {:<12} match {:.1} via {}",
            ranked.stream.stream_name,
            ranked.stream.duration,
            ranked.match_score,
            ranked.career_field
        );
    }

    let report = service.progress(&user, Utc::now())?;
    render_progress_report(&user, &report);

    if let Some(award) = report.certificates.first() {
        let document = service
            .certificate(&user, "Demo User", &award.title, Utc::now())?
            .unwrap_or_default();
        println!(
            "\nRendered the '{}' certificate ({} bytes of PDF)",
            award.title,
            document.len()
        );
    }

    println!(
        "\n{} activity record(s) captured in this demo session",
        log.records().len()
    );
    Ok(())
}

fn render_progress_report(user_id: &str, report: &ProgressReport) {
    println!("\nProgress report for {user_id}");
    println!(
        "  {} activities, average score {:.1}%, {} in the last 7 days",
        report.summary.total_activities,
        report.summary.average_score,
        report.summary.recent_activities
    );
    println!(
        "  streak: {} day(s) current, {} best, {} study day(s) total",
        report.streaks.current, report.streaks.best, report.streaks.study_days
    );

    println!("  milestones:");
    for milestone in &report.milestones {
        if milestone.achieved {
            println!("    [x] {} activities", milestone.threshold);
        } else {
            println!(
                "    [ ] {} activities ({} to go)",
                milestone.threshold, milestone.remaining
            );
        }
    }

    if !report.certificates.is_empty() {
        println!("  certificates available:");
        for award in &report.certificates {
            match award.score {
                Some(score) => println!("    - {} ({:.1}%)", award.title, score),
                None => println!("    - {}", award.title),
            }
        }
    }

    if !report.suggestions.is_empty() {
        println!("  suggestions:");
        for suggestion in &report.suggestions {
            println!("    - {suggestion}");
        }
    }
}

fn wrong_answer(correct: AnswerLetter) -> AnswerLetter {
    match correct {
        AnswerLetter::A => AnswerLetter::B,
        _ => AnswerLetter::A,
    }
}

fn demo_reference_data() -> ReferenceData {
    let mut questions = Vec::new();
    let subjects = ["Mathematics", "Science", "Verbal", "Logic"];
    let letters = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
    ];
    for (count, difficulty) in [
        (8, Difficulty::Beginner),
        (12, Difficulty::Intermediate),
        (8, Difficulty::Advanced),
    ] {
        for _ in 0..count {
            let i = questions.len();
            questions.push(Question {
                id: format!("demo-{i}"),
                text: format!("Demo question {i}"),
                stream: subjects[i % subjects.len()].to_string(),
                difficulty,
                options: [
                    "first option".to_string(),
                    "second option".to_string(),
                    "third option".to_string(),
                    "fourth option".to_string(),
                ],
                correct_answer: letters[i % letters.len()],
                explanation: None,
            });
        }
    }

    let career_questions = vec![
        career_question("Technology", QuestionKind::Scale),
        career_question("Technology", QuestionKind::Scale),
        career_question("Healthcare", QuestionKind::Scale),
        career_question("Business", QuestionKind::MultipleChoice),
        career_question("Creative Arts", QuestionKind::Scale),
    ];

    let streams = vec![
        stream("Software Engineering", "Technology", "12 weeks"),
        stream("Data Science", "Technology", "3 months"),
        stream("Cloud Computing", "Technology", "Self-paced"),
        stream("Nursing Foundations", "Science", "8 weeks"),
        stream("Graphic Design", "Arts", "Self-paced"),
        stream("Business Analytics", "Business", "6 weeks"),
    ];

    ReferenceData {
        students: Vec::new(),
        questions,
        career_questions,
        streams,
    }
}

fn career_question(field: &str, kind: QuestionKind) -> CareerQuestion {
    CareerQuestion {
        text: format!("How much do you enjoy working in {field}?"),
        career_field: field.to_string(),
        kind,
        options: [
            "Not at all".to_string(),
            "A little".to_string(),
            "Somewhat".to_string(),
            "Very much".to_string(),
        ],
    }
}

fn stream(name: &str, category: &str, duration: &str) -> StreamRecommendation {
    StreamRecommendation {
        stream_name: name.to_string(),
        category: category.to_string(),
        description: format!("{name} learning path"),
        difficulty_level: "Intermediate".to_string(),
        resource_type: "Course".to_string(),
        duration: duration.to_string(),
        url: None,
        platform: "OpenLearn".to_string(),
    }
}
