use manytomany::{ComparisonError, MatchConfig, Matcher, Record, RecordTable};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Manytomany v{}", manytomany::VERSION);
    println!("==========================================");

    let mentors = RecordTable::from_records(vec![
        person("alice", 12, &["rust", "databases"]),
        person("bilal", 3, &["frontend", "design"]),
        person("chen", 9, &["rust", "compilers"]),
        person("dana", 4, &["frontend", "accessibility"]),
        person("emeka", 15, &["databases", "distributed"]),
        person("farah", 2, &["design", "research"]),
        person("goran", 7, &["ml"]),
    ])?;
    let mentees = RecordTable::from_records(vec![
        person("hana", 0, &["frontend"]),
        person("ivan", 1, &["rust"]),
        person("jun", 0, &["design"]),
        person("kofi", 2, &["databases", "rust"]),
        person("lena", 1, &["accessibility"]),
    ])?;

    let config = MatchConfig::new(3, 2);
    let report = Matcher::new(config).run(&mentors, &mentees, group_distance, mentor_distance)?;

    println!("\n=== Groups ===");
    for (id, members) in report.groups.iter() {
        let names: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
        println!("{}: {}", id, names.join(", "));
    }
    for mentor in report.groups.unassigned() {
        println!("ungrouped: {}", mentor);
    }

    println!("\n=== By mentor ===");
    println!("{}", serde_json::to_string_pretty(report.by_mentor())?);
    println!("\n=== By mentee ===");
    println!("{}", serde_json::to_string_pretty(report.by_mentee())?);

    Ok(())
}

fn person(name: &str, years: i64, topics: &[&str]) -> Record {
    Record::new(name)
        .with("years", years)
        .with("topics", topics.to_vec())
}

fn years(record: &Record) -> Result<f64, ComparisonError> {
    record
        .get("years")
        .and_then(|v| v.as_number())
        .ok_or_else(|| format!("{} has no years attribute", record.key).into())
}

/// Mentors with different experience and no shared topics are far apart.
fn mentor_distance(a: &Record, b: &Record) -> Result<f64, ComparisonError> {
    let shared = match (a.get("topics"), b.get("topics")) {
        (Some(x), Some(y)) => x.shared_items(y) as f64,
        _ => 0.0,
    };
    Ok((years(a)? - years(b)?).abs() - 5.0 * shared)
}

/// Prefer groups whose topics cover the mentee's and whose members are not
/// too far ahead of them.
fn group_distance(group: &[&Record], mentee: &Record) -> Result<f64, ComparisonError> {
    let mut cost = 0.0;
    for mentor in group {
        let shared = match (mentor.get("topics"), mentee.get("topics")) {
            (Some(x), Some(y)) => x.shared_items(y) as f64,
            _ => 0.0,
        };
        cost += (years(mentor)? - years(mentee)?) / 4.0 - 3.0 * shared;
    }
    Ok(cost)
}
