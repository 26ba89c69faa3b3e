//! CLI command parsing and end-to-end tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), request
//! document handling, and the built binary's behavior.

// ============================================================================
// Request documents
// ============================================================================

mod request_documents {
    use qvis_ir::{CircuitLimits, library};
    use qvis_sim::{SimulationRequest, SimulationService};
    use std::io::Write;

    #[test]
    fn test_every_example_serializes_to_a_runnable_request() {
        let service = SimulationService::default();
        for example in &library::EXAMPLES {
            let circuit = example.build(&CircuitLimits::default()).unwrap();
            let json = serde_json::to_string_pretty(&SimulationRequest::from_circuit(&circuit))
                .unwrap();
            let response = service.handle_json(&json);
            assert!(response.success, "{} failed: {:?}", example.name, response.error);
            assert_eq!(response.circuit_size, Some(circuit.size()));
        }
    }

    #[test]
    fn test_request_file_with_params_and_matrix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "num_qubits": 2,
                "operations": [
                    {{"gate": "ry", "qubits": [0], "params": [1.5707963267948966]}},
                    {{"gate": "unitary", "qubits": [1],
                      "matrix": [[[0.0, 0.0], [1.0, 0.0]], [[1.0, 0.0], [0.0, 0.0]]]}},
                    {{"gate": "CX", "qubits": [0, 1]}}
                ],
                "shots": 10,
                "seed": 3
            }}"#
        )
        .unwrap();

        let source = std::fs::read_to_string(file.path()).unwrap();
        let request: SimulationRequest = serde_json::from_str(&source).unwrap();
        let response = SimulationService::default().handle(&request);
        assert!(response.success);
        // Ry(π/2) then X on q1 then CX: outcomes 10 and 01 equally likely.
        let probs = response.probabilities.unwrap();
        assert!((probs[0b10] - 0.5).abs() < 1e-10);
        assert!((probs[0b01] - 0.5).abs() < 1e-10);
        assert_eq!(response.counts.unwrap().values().sum::<u64>(), 10);
    }

    #[test]
    fn test_non_unitary_matrix_rejected() {
        let response = SimulationService::default().handle_json(
            r#"{"num_qubits": 1, "operations": [
                {"gate": "unitary", "qubits": [0],
                 "matrix": [[[1.0, 0.0], [1.0, 0.0]], [[0.0, 0.0], [1.0, 0.0]]]}
            ]}"#,
        );
        assert!(!response.success);
        assert!(response.error.unwrap().contains("not unitary"));
    }

    #[test]
    fn test_unknown_gate_rejected() {
        let response = SimulationService::default().handle_json(
            r#"{"num_qubits": 3, "operations": [{"gate": "ccx", "qubits": [0, 1, 2]}]}"#,
        );
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Operation #0: unknown gate 'ccx'")
        );
    }
}

// ============================================================================
// clap parsing
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    /// Mirror of the CLI struct for parse testing.
    #[derive(Parser, Debug)]
    #[command(name = "qvis")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(short, long, global = true)]
        config: Option<PathBuf>,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand, Debug)]
    enum TestCommands {
        Simulate {
            #[arg(short, long, conflicts_with = "example", required_unless_present = "example")]
            input: Option<PathBuf>,
            #[arg(short, long)]
            example: Option<String>,
            #[arg(short, long, default_value = "table")]
            format: String,
            #[arg(short, long)]
            shots: Option<u32>,
            #[arg(long)]
            seed: Option<u64>,
        },
        Examples {
            #[arg(short, long)]
            name: Option<String>,
        },
        Version,
    }

    #[test]
    fn test_parse_simulate_example() {
        let cli = TestCli::try_parse_from(["qvis", "simulate", "-e", "bell_state"]).unwrap();
        match cli.command {
            TestCommands::Simulate {
                input,
                example,
                format,
                shots,
                seed,
            } => {
                assert!(input.is_none());
                assert_eq!(example.as_deref(), Some("bell_state"));
                assert_eq!(format, "table");
                assert!(shots.is_none());
                assert!(seed.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_simulate_input_with_options() {
        let cli = TestCli::try_parse_from([
            "qvis", "simulate", "-i", "circuit.json", "-f", "json", "-s", "100", "--seed", "9",
            "-c", "qvis.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("qvis.yaml")));
        match cli.command {
            TestCommands::Simulate {
                input,
                format,
                shots,
                seed,
                ..
            } => {
                assert_eq!(input, Some(PathBuf::from("circuit.json")));
                assert_eq!(format, "json");
                assert_eq!(shots, Some(100));
                assert_eq!(seed, Some(9));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_simulate_requires_a_source() {
        assert!(TestCli::try_parse_from(["qvis", "simulate"]).is_err());
    }

    #[test]
    fn test_simulate_sources_conflict() {
        let result =
            TestCli::try_parse_from(["qvis", "simulate", "-i", "a.json", "-e", "bell_state"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_examples() {
        let cli = TestCli::try_parse_from(["qvis", "examples", "-n", "x_gate"]).unwrap();
        assert!(matches!(
            cli.command,
            TestCommands::Examples { name: Some(ref n) } if n == "x_gate"
        ));
    }

    #[test]
    fn test_parse_verbose_counts() {
        let cli = TestCli::try_parse_from(["qvis", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_no_subcommand() {
        assert!(TestCli::try_parse_from(["qvis"]).is_err());
    }
}

// ============================================================================
// Binary
// ============================================================================

mod binary {
    use std::process::Command;

    fn qvis() -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_qvis"));
        for key in [
            "QVIS_CONFIG",
            "QVIS_MAX_QUBITS",
            "QVIS_MAX_OPERATIONS",
            "QVIS_MEMORY_BUDGET_BYTES",
            "QVIS_MAX_SHOTS",
            "QVIS_NORM_TOLERANCE",
            "QVIS_PARALLEL_THRESHOLD_QUBITS",
            "QVIS_LOG_LEVEL",
            "QVIS_LOG_FORMAT",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }

    #[test]
    fn test_simulate_example_json() {
        let output = qvis()
            .args(["simulate", "--example", "ghz_state", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["num_qubits"], 3);
        assert_eq!(json["circuit_depth"], 3);
        assert_eq!(json["statevector"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_examples_prints_request() {
        let output = qvis().args(["examples", "--name", "x_gate"]).output().unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["num_qubits"], 1);
        assert_eq!(json["operations"][0]["gate"], "x");
    }

    #[test]
    fn test_invalid_request_exits_nonzero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"num_qubits": 2, "operations": [{"gate": "cx", "qubits": [0, 0]}]}"#,
        )
        .unwrap();

        let output = qvis()
            .args(["simulate", "--input"])
            .arg(file.path())
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("both control and target"));
    }

    #[test]
    fn test_unknown_example_exits_nonzero() {
        let output = qvis()
            .args(["simulate", "--example", "teleport"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown example"));
    }

    #[test]
    fn test_shots_above_limit_exit_nonzero() {
        let output = qvis()
            .args(["simulate", "--example", "bell_state", "--shots", "2000000"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("(resource_limit)"));
    }
}
