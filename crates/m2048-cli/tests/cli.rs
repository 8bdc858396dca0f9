use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde_json::Value;

fn m2048(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_m2048"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run m2048")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn eval_lines(rows: &[([f64; 4], u32)]) -> String {
    rows.iter()
        .map(|(e, p)| format!("{} {} {} {} {p}\n", e[0], e[1], e[2], e[3]))
        .collect()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// A board-data root with a perfect player and two runs of one configuration.
struct Fixture {
    _dir: tempfile::TempDir,
    board: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let board = dir.path().join("board_data");
        let output = dir.path().join("output");
        let perfect = (0..30)
            .map(|i| ([1.0, 0.5, 0.0, 0.0], i))
            .collect::<Vec<_>>();
        let player = (0..30)
            .map(|i| {
                if i % 3 == 0 {
                    ([0.0, 2.0, 0.0, 0.0], i)
                } else {
                    ([3.0, 0.0, 0.0, 0.0], i)
                }
            })
            .collect::<Vec<_>>();
        for (name, sym) in [("NT6_sym_seed1", "sym"), ("NT6_notsym_seed1", "notsym")] {
            let run = board.join(name);
            write(&run.join("eval-state.txt"), &eval_lines(&perfect));
            write(&run.join("eval.txt"), &eval_lines(&player));
            write(
                &run.join("state.txt"),
                "progress: 10 score: 100\nprogress: 20 score: 400\n",
            );
            write(
                &run.join("meta.json"),
                &format!(r#"{{"tuple": 6, "sym": "{sym}", "seed": 1}}"#),
            );
        }
        write(
            &board.join("PP/state.txt"),
            "progress: 30 score: 900\nprogress: 30 score: 1000\n",
        );
        Self {
            _dir: dir,
            board,
            output,
        }
    }

    fn graph(&self, args: &[&str]) -> Output {
        let mut all = vec![
            "graph",
            "--board-dir",
            path_arg(&self.board),
            "--output-dir",
            path_arg(&self.output),
        ];
        all.extend_from_slice(args);
        m2048(&all)
    }
}

#[test]
fn graph_accuracy_writes_svg_csv_and_config() {
    let fixture = Fixture::new();
    let output = fixture.graph(&["acc", "--csv"]);
    assert!(output.status.success(), "{output:?}");

    let svg = fs::read_to_string(fixture.output.join("accuracy.svg")).unwrap();
    assert!(svg.contains("<svg"));
    let csv = fs::read_to_string(fixture.output.join("accuracy.csv")).unwrap();
    assert!(csv.starts_with("series,x,y\n"));
    assert!(csv.contains("NT6_sym_seed1,"));

    let config: Value =
        serde_json::from_str(&fs::read_to_string(fixture.output.join("config.json")).unwrap())
            .unwrap();
    assert_eq!(config["NT6_sym_seed1"]["label"], "NT6_sym_s1");
    assert_eq!(config["PP"]["label"], "PP");
    assert_eq!(config["NT6_notsym_seed1"]["linestyle"], "solid");
}

#[test]
fn graph_mean_symdiff_and_survival() {
    let fixture = Fixture::new();
    let output = fixture.graph(&["acc-mean", "--symdiff", "--csv"]);
    assert!(output.status.success(), "{output:?}");
    let csv = fs::read_to_string(fixture.output.join("accuracy_mean_symdiff.csv")).unwrap();
    assert!(csv.contains("NT6_sym-notsym,"));

    let output = fixture.graph(&["surv-diff", "-o", "surv.svg"]);
    assert!(output.status.success(), "{output:?}");
    assert!(fixture.output.join("surv.svg").exists());
}

#[test]
fn graph_rejects_invalid_combinations() {
    let fixture = Fixture::new();
    let output = fixture.graph(&["acc", "--symdiff"]);
    assert!(!output.status.success());

    let output = fixture.graph(&["acc-diff", "--intersection", "NT6_sym_"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 2 runs"));

    let output = fixture.graph(&["err-abs", "--window", "0"]);
    assert!(!output.status.success());
    assert!(!fixture.output.join("error_abs.svg").exists());
}

#[test]
fn graph_histograms_per_directory() {
    let fixture = Fixture::new();
    let output = fixture.graph(&["hist"]);
    assert!(output.status.success(), "{output:?}");
    for name in ["PP", "NT6_sym_seed1", "NT6_notsym_seed1"] {
        assert!(
            fixture.output.join(format!("histogram-{name}.svg")).exists(),
            "{name}"
        );
    }
}

#[test]
fn write_meta_refuses_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let board = dir.path().join("board_data");
    let data_dir = board.join("run/seed3/NT6_sym");
    fs::create_dir_all(&data_dir).unwrap();
    let args = [
        "write-meta",
        path_arg(&data_dir),
        "/ev/6tuple_sym_data_3_2.dat",
        "--board-dir",
        path_arg(&board),
    ];

    let output = m2048(&args);
    assert!(output.status.success(), "{output:?}");
    let meta: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("meta.json")).unwrap()).unwrap();
    assert_eq!(meta["tuple"], 6);
    assert_eq!(meta["sym"], "sym");
    assert_eq!(meta["seed"], 3);
    assert_eq!(meta["stage"], 2);
    assert_eq!(meta["evfile"], "6tuple_sym_data_3_2.dat");
    assert_eq!(meta["relpath"], "run/seed3/NT6_sym");
    assert_eq!(meta["id"], "run__seed3__NT6_sym");

    let output = m2048(&args);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));

    let mut forced = args.to_vec();
    forced.push("--force");
    assert!(m2048(&forced).status.success());

    let output = m2048(&["write-meta", path_arg(&data_dir), "bogus.dat", "--force"]);
    assert!(!output.status.success());
}

#[test]
fn export_score_averages_writes_complete_intervals() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("train.log");
    let csv = dir.path().join("out/avg.csv");
    write(
        &log,
        "game 1 finished with score 10\n\
         game 2 finished with score 20\n\
         game 3 finished with score 40\n",
    );
    let output = m2048(&[
        "export-score-averages",
        "-i",
        path_arg(&log),
        "-o",
        path_arg(&csv),
        "-a",
        "2",
    ]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        fs::read_to_string(&csv).unwrap(),
        "start_game,end_game,avg_score,count\n1,2,15.000000,2\n"
    );
}

#[test]
fn average_progress_groups_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let line = |p: u32| format!("gameover_turn: 5; game: 1; progress: {p}; score: 10\n");
    let a = dir.path().join("NT4_sym_seed1");
    let b = dir.path().join("NT4_sym_seed2");
    let empty = dir.path().join("empty");
    write(&a.join("after-state.txt"), &line(10));
    write(&b.join("after-state.txt"), &line(30));
    fs::create_dir_all(&empty).unwrap();

    let output = m2048(&[
        "average-progress",
        path_arg(&a),
        path_arg(&b),
        path_arg(&empty),
    ]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let row = text
        .lines()
        .find(|l| l.starts_with("NT4_sym "))
        .expect("group row");
    let fields = row.split_whitespace().collect::<Vec<_>>();
    assert_eq!(fields, ["NT4_sym", "20.00", "20.00", "14.14", "2"]);
    assert!(text.contains("Directories with no valid progress data:"));
    assert!(text.contains(path_arg(&empty)));
}

#[test]
fn tile_matches_reports_shared_patterns() {
    let dir = tempfile::tempdir().unwrap();
    let header = "tile0,tile1,tile2,tile3,tile4,tile5,tile6,tile7,tile8\n";
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");
    write(
        &a,
        &format!("{header}0,1,2,0,0,1,0,0,0\n0,1,2,0,0,1,0,0,0\n1,1,1,1,1,1,1,1,1\n"),
    );
    write(&b, &format!("{header}0,1,2,0,0,1,0,0,0\n"));

    let output = m2048(&["tile-matches", path_arg(&a), path_arg(&b), "--pattern"]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains(" 1: [0,1,2,0,0,1,0,0,0] -> 1"));
    assert!(text.contains("Pattern [0,1,2,0,0,1,0,0,0]"));
    assert!(text.contains("Matches ratio (a/b): 2.0000"));
}

#[test]
fn learning_curve_and_score_log_render() {
    let dir = tempfile::tempdir().unwrap();
    let sym = dir.path().join("sym.csv");
    write(&sym, "updatecounts,err,aerr\n1,1,2\n2,1,0\n3,1,4\n");
    let svg = dir.path().join("curves.svg");
    let output = m2048(&[
        "learning-curve",
        &format!("sym={}", path_arg(&sym)),
        "-o",
        path_arg(&svg),
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("Data points: 2"));
    assert!(svg.exists());

    let root = dir.path().join("ntuple_dat");
    for seed in [1, 2] {
        write(
            &root.join(format!("run/seed{seed}/NT6_sym/log_score.csv")),
            &format!("traincount_total,avg_score\n100,{}\n", seed * 10),
        );
    }
    write(
        &root.join("run/seed1/NT4_sym/log_score.csv"),
        "traincount_total,avg_score\n100,5\n",
    );
    let out_dir = dir.path().join("score");
    let output = m2048(&[
        "score-log",
        "--run-name",
        "run",
        "--dat-root",
        path_arg(&root),
        "--output-dir",
        path_arg(&out_dir),
        "--split-nt",
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("NT6_sym: 1 points, up to 2 seeds"));
    assert!(out_dir.join("score_log_mean_NT4.svg").exists());
    assert!(out_dir.join("score_log_mean_NT6.svg").exists());
}

#[test]
fn pattern_frequency_compares_sym_and_notsym() {
    let dir = tempfile::tempdir().unwrap();
    let header = "game_id,tile0,tile1,tile2,tile3,tile4,tile5,tile6,tile7,tile8\n";
    let sym = dir.path().join("board_log.csv");
    let notsym = dir.path().join("board_log_notsym.csv");
    write(
        &sym,
        &format!("{header}1,0,1,2,0,0,1,0,0,0\n2,0,1,2,0,0,1,0,0,0\n3,0,1,2,0,0,1,0,0,0\n"),
    );
    write(&notsym, &format!("{header}4,0,1,2,0,0,1,0,0,0\n4,1,1,1,1,1,1,1,1,1\n"));
    let svg = dir.path().join("freq.svg");

    let output = m2048(&[
        "pattern-frequency",
        "--sym",
        path_arg(&sym),
        "--notsym",
        path_arg(&notsym),
        "-g",
        "2",
        "-o",
        path_arg(&svg),
        "--csv",
    ]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("Tracking pattern: [0,1,2,0,0,1,0,0,0]"));
    assert!(text.contains("Sym total matches: 3"));
    assert!(text.contains("Notsym total matches: 1"));
    assert!(svg.exists());
    let csv = fs::read_to_string(svg.with_extension("csv")).unwrap();
    assert!(csv.contains("sym,2,2\n"));
    assert!(csv.contains("notsym,4,1\n"));

    let output = m2048(&[
        "pattern-frequency",
        "--sym",
        path_arg(&sym),
        "--notsym",
        path_arg(&notsym),
        "--pattern",
        "9,9,9,9,9,9,9,9,9",
        "-o",
        path_arg(&dir.path().join("none.svg")),
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("No matches found in either file."));
    assert!(!dir.path().join("none.svg").exists());

    let output = m2048(&["pattern-frequency", "-g", "0"]);
    assert!(!output.status.success());
}

#[test]
fn plot_scores_overlays_interval_averages() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("sym_log.txt");
    let b = dir.path().join("notsym_log.txt");
    write(
        &a,
        "game 1 finished with score 10\n\
         game 2 finished with score 30\n\
         game 3 finished with score 50\n\
         game 4 finished with score 70\n",
    );
    write(&b, "game 1 finished with score 4\ngame 2 finished with score 8\n");
    let svg = dir.path().join("scores.svg");

    let output = m2048(&[
        "plot-scores",
        path_arg(&a),
        path_arg(&b),
        "-a",
        "2",
        "-o",
        path_arg(&svg),
        "--csv",
    ]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("Plotting 2 points for sym_log"));
    assert!(text.contains("Plotting 1 points for notsym_log"));
    assert!(text.contains("sym_log: min=20.0, max=60.0, final=60.0"));
    assert!(svg.exists());
    let csv = fs::read_to_string(svg.with_extension("csv")).unwrap();
    assert!(csv.contains("notsym_log,2,6\n"));
}
