use cypher_ai::engines::generation::{EvolutionOutcome, GenerationReport, ProgressCallback};
use cypher_ai::ml::ArchitectureSearchOutcome;
use cypher_ai::protocol::{CommandHandler, DispatchExit, Dispatcher};
use cypher_ai::{CypherError, Fitness, Result, Sector};
use std::io::Cursor;

/// Records calls and emits a fixed number of progress events per run
#[derive(Default)]
struct RecordingHandler {
    evolved: Vec<Sector>,
    searched: Vec<Sector>,
    fail_next_evolve: bool,
}

impl CommandHandler for RecordingHandler {
    fn evolve(&mut self, sector: Sector, progress: &mut dyn ProgressCallback) -> Result<EvolutionOutcome> {
        if self.fail_next_evolve {
            self.fail_next_evolve = false;
            return Err(CypherError::Evolution("scorer exploded".to_string()));
        }
        self.evolved.push(sector);

        for generation in 0..2 {
            progress.on_generation_complete(&GenerationReport {
                sector,
                generation,
                best_fitness: 60.0 + generation as f64,
                avg_fitness: 50.0,
                diversity: 0.4,
                population_size: 4,
            })?;
        }

        Ok(EvolutionOutcome {
            best_individual: vec![1, 0, 1, 1],
            fitness: Fitness::new(61.0, 0.08),
            generation: 1,
            hall_of_fame: vec![vec![1, 0, 1, 1], vec![0, 0, 1, 1]],
        })
    }

    fn architecture_search(&mut self, sector: Sector) -> Result<ArchitectureSearchOutcome> {
        self.searched.push(sector);
        Ok(ArchitectureSearchOutcome {
            sector,
            best_architecture: vec![128, 64],
            accuracy: 0.91,
        })
    }
}

fn run_lines(handler: RecordingHandler, input: &str) -> (RecordingHandler, String, String, cypher_ai::protocol::DispatchSummary) {
    let mut dispatcher = Dispatcher::new(handler);
    let mut output = Vec::new();
    let mut errors = Vec::new();

    let summary = dispatcher
        .run(Cursor::new(input.to_string()), &mut output, &mut errors)
        .unwrap();

    (
        dispatcher.into_handler(),
        String::from_utf8(output).unwrap(),
        String::from_utf8(errors).unwrap(),
        summary,
    )
}

#[test]
fn test_evolve_streams_progress_then_result() {
    let (handler, output, errors, summary) = run_lines(
        RecordingHandler::default(),
        "{\"command\": \"evolve\", \"sector\": \"FERPA\"}\n",
    );

    assert_eq!(handler.evolved, vec![Sector::Ferpa]);
    assert!(errors.is_empty());
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.exit, DispatchExit::EndOfInput);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("EVOLUTION:"));
    assert!(lines[1].starts_with("EVOLUTION:"));

    let payload: serde_json::Value =
        serde_json::from_str(lines[2].strip_prefix("FITNESS:").unwrap()).unwrap();
    assert_eq!(payload["best_individual"], serde_json::json!([1, 0, 1, 1]));
    assert_eq!(payload["fitness"], serde_json::json!([61.0, 0.08]));
    assert_eq!(payload["generation"], 1);
    assert_eq!(payload["hall_of_fame"].as_array().unwrap().len(), 2);
}

#[test]
fn test_nas_reply() {
    let (handler, output, _, _) = run_lines(
        RecordingHandler::default(),
        "{\"command\": \"nas\", \"sector\": \"CIPA\"}\n",
    );

    assert_eq!(handler.searched, vec![Sector::Cipa]);
    let payload: serde_json::Value =
        serde_json::from_str(output.trim_end().strip_prefix("NAS:").unwrap()).unwrap();
    assert_eq!(payload["sector"], "CIPA");
    assert_eq!(payload["best_architecture"], serde_json::json!([128, 64]));
    assert_eq!(payload["accuracy"], 0.91);
}

#[test]
fn test_shutdown_stops_before_later_lines() {
    let input = "{\"command\": \"shutdown\"}\n{\"command\": \"evolve\"}\n{\"command\": \"nas\"}\n";
    let (handler, output, _, summary) = run_lines(RecordingHandler::default(), input);

    assert_eq!(summary.exit, DispatchExit::Shutdown);
    assert_eq!(summary.executed, 0);
    assert!(handler.evolved.is_empty());
    assert!(handler.searched.is_empty());
    assert!(output.is_empty());
}

#[test]
fn test_malformed_lines_are_skipped() {
    let input = "not json\n\n{\"command\": \"unknown\"}\n[1,2,3]\n{\"command\": \"evolve\"}\n";
    let (handler, output, errors, summary) = run_lines(RecordingHandler::default(), input);

    assert_eq!(handler.evolved, vec![Sector::General]);
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.executed, 1);
    assert!(errors.is_empty());
    assert!(output.lines().last().unwrap().starts_with("FITNESS:"));
}

#[test]
fn test_non_json_line_leaves_state_untouched() {
    let (handler, output, errors, summary) = run_lines(RecordingHandler::default(), "not json\n");

    assert!(handler.evolved.is_empty());
    assert!(handler.searched.is_empty());
    assert!(output.is_empty());
    assert!(errors.is_empty());
    assert_eq!(summary.exit, DispatchExit::EndOfInput);
}

#[test]
fn test_command_failure_reported_and_loop_continues() {
    let handler = RecordingHandler {
        fail_next_evolve: true,
        ..Default::default()
    };
    let input = "{\"command\": \"evolve\"}\n{\"command\": \"nas\", \"sector\": \"HIPAA\"}\n{\"command\": \"evolve\", \"sector\": \"FISMA\"}\n";
    let (handler, output, errors, summary) = run_lines(handler, input);

    let error_lines: Vec<&str> = errors.lines().collect();
    assert_eq!(error_lines, vec![
        "ERROR: Evolution error: scorer exploded",
        "ERROR: Unknown sector: HIPAA",
    ]);
    assert_eq!(summary.failed, 2);
    assert_eq!(handler.evolved, vec![Sector::Fisma]);
    assert!(output.lines().last().unwrap().starts_with("FITNESS:"));
}

#[test]
fn test_invalid_utf8_line_is_skipped() {
    let mut dispatcher = Dispatcher::new(RecordingHandler::default());
    let input: &[u8] = b"\xff\xfe garbage\n{\"command\": \"nas\"}\n";
    let mut output = Vec::new();
    let mut errors = Vec::new();

    let summary = dispatcher.run(Cursor::new(input), &mut output, &mut errors).unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.exit, DispatchExit::EndOfInput);
    assert_eq!(dispatcher.handler().searched, vec![Sector::General]);
    assert!(String::from_utf8(output).unwrap().starts_with("NAS:"));
    assert!(errors.is_empty());
}
