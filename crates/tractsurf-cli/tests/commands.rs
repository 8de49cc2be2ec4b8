//! End-to-end command scenarios on temporary files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tractsurf_core::{FieldHost, FieldOwner};
use tractsurf_engine::{RunConfig, Verbosity};
use tractsurf_io::{read_surface, read_tractogram, write_surface, write_tractogram};
use tractsurf_space::Tractogram;
use tractsurf_test_utils::{random_walk_tractogram, single_triangle};

use tractsurf_cli::{
    run_field_import, run_track2surf, CommandError, FieldImportRequest, Outcome,
    Track2SurfRequest,
};

fn config(threads: usize) -> RunConfig {
    RunConfig {
        threads: Some(threads),
        verbosity: Verbosity::Warn,
        time_limit: None,
    }
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn tractogram(&self, name: &str, t: &Tractogram) -> PathBuf {
        let p = self.path(name);
        write_tractogram(&p, t).unwrap();
        p
    }

    fn triangle(&self) -> PathBuf {
        let p = self.path("triangle.vtk");
        write_surface(&p, &single_triangle()).unwrap();
        p
    }
}

fn through_triangle() -> Tractogram {
    Tractogram::from_streamlines([[[0.5, 0.5, -1.0], [0.5, 0.5, 1.0]]])
}

fn track2surf(ws: &Workspace, feature: &str, force: bool) -> Track2SurfRequest {
    Track2SurfRequest {
        tractogram: ws.tractogram("tracts.vtk", &through_triangle()),
        surface: ws.triangle(),
        output: ws.path("out.vtk"),
        name: "x".into(),
        feature: feature.into(),
        force,
    }
}

fn import(tractogram: &Path, field_file: &Path, name: &str, force: bool) -> FieldImportRequest {
    FieldImportRequest {
        tractogram: tractogram.to_path_buf(),
        field_file: field_file.to_path_buf(),
        owner: "POINT".into(),
        datatype: "float".into(),
        dimension: 1,
        name: name.into(),
        force,
    }
}

// ── track2surf ──────────────────────────────────────────────────

#[test]
fn triangle_density_is_written() {
    let ws = Workspace::new();
    let req = track2surf(&ws, "streamlineDensity", false);
    let outcome = run_track2surf(&req, &config(2)).unwrap();
    assert_eq!(outcome, Outcome::Written { path: req.output.clone() });

    let out = read_surface(&req.output).unwrap();
    let face = out.fields().get("face_x").unwrap();
    assert_eq!(face.owner(), FieldOwner::Face);
    assert_eq!(face.floats().unwrap(), &[0.5]);
    assert_eq!(
        out.fields().get("vertex_x").unwrap().floats().unwrap(),
        &[0.5, 0.5, 0.5]
    );
}

#[test]
fn triangle_count_is_an_int_field() {
    let ws = Workspace::new();
    let req = track2surf(&ws, "streamlineCount", false);
    run_track2surf(&req, &config(1)).unwrap();
    let out = read_surface(&req.output).unwrap();
    assert_eq!(out.fields().get("face_x").unwrap().ints().unwrap(), &[1]);
}

#[test]
fn invalid_feature_writes_nothing() {
    let ws = Workspace::new();
    let req = track2surf(&ws, "fiberLength", false);
    let err = run_track2surf(&req, &config(1)).unwrap_err();
    let CommandError::Validation { message } = &err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(message.contains("contactDirection"));
    assert!(!req.output.exists());
}

#[test]
fn empty_tractogram_is_not_an_error() {
    let ws = Workspace::new();
    let mut req = track2surf(&ws, "contactAngle", false);
    req.tractogram = ws.tractogram("empty.vtk", &Tractogram::empty());
    assert_eq!(run_track2surf(&req, &config(1)).unwrap(), Outcome::NoWork);
    assert!(!req.output.exists());
}

#[test]
fn existing_output_needs_force() {
    let ws = Workspace::new();
    let req = track2surf(&ws, "streamlineDensity", false);
    fs::write(&req.output, b"keep me").unwrap();
    assert!(matches!(
        run_track2surf(&req, &config(1)),
        Err(CommandError::Conflict { .. })
    ));
    assert_eq!(fs::read(&req.output).unwrap(), b"keep me");

    let forced = Track2SurfRequest { force: true, ..req };
    run_track2surf(&forced, &config(1)).unwrap();
    assert!(read_surface(&forced.output).unwrap().fields().contains("face_x"));
}

#[test]
fn existing_feature_fields_need_force() {
    let ws = Workspace::new();
    let first = track2surf(&ws, "streamlineCount", false);
    run_track2surf(&first, &config(1)).unwrap();

    // Feed the output back in as the input surface.
    let again = Track2SurfRequest {
        surface: first.output.clone(),
        output: ws.path("again.vtk"),
        ..first.clone()
    };
    assert!(matches!(
        run_track2surf(&again, &config(1)),
        Err(CommandError::Conflict { .. })
    ));
    assert!(!again.output.exists());

    let forced = Track2SurfRequest {
        force: true,
        feature: "streamlineDensity".into(),
        ..again
    };
    run_track2surf(&forced, &config(1)).unwrap();
    let out = read_surface(&forced.output).unwrap();
    assert_eq!(out.fields().len(), 2);
    assert_eq!(out.fields().get("face_x").unwrap().floats().unwrap(), &[0.5]);
}

#[test]
fn output_must_be_vtk() {
    let ws = Workspace::new();
    let mut req = track2surf(&ws, "streamlineDensity", false);
    req.output = ws.path("out.gii");
    assert!(matches!(
        run_track2surf(&req, &config(1)),
        Err(CommandError::Validation { .. })
    ));
}

#[test]
fn missing_input_is_a_validation_error() {
    let ws = Workspace::new();
    let mut req = track2surf(&ws, "streamlineDensity", false);
    req.surface = ws.path("absent.vtk");
    assert!(matches!(
        run_track2surf(&req, &config(1)),
        Err(CommandError::Validation { .. })
    ));
}

#[test]
fn result_is_independent_of_thread_count() {
    let ws = Workspace::new();
    let t = random_walk_tractogram(11, 200, 30, 1.5, 0.2);
    let mut outputs = Vec::new();
    for threads in [1, 4] {
        let req = Track2SurfRequest {
            tractogram: ws.tractogram("walks.vtk", &t),
            surface: ws.triangle(),
            output: ws.path(&format!("out{threads}.vtk")),
            name: "dir".into(),
            feature: "contactDirection".into(),
            force: false,
        };
        run_track2surf(&req, &config(threads)).unwrap();
        outputs.push(fs::read(&req.output).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn exhausted_time_limit_writes_nothing() {
    let ws = Workspace::new();
    let req = track2surf(&ws, "streamlineDensity", false);
    let cfg = RunConfig {
        time_limit: Some(Duration::from_nanos(1)),
        ..config(1)
    };
    let err = run_track2surf(&req, &cfg).unwrap_err();
    let CommandError::TimeLimitExceeded(e) = &err else {
        panic!("expected the time limit to be exceeded, got {err:?}");
    };
    assert_eq!(e.stage, "loading");
    assert_eq!(err.exit_code(), 1);
    assert!(!req.output.exists());
}

// ── field-import ────────────────────────────────────────────────

#[test]
fn exhausted_time_limit_leaves_tractogram_untouched() {
    let ws = Workspace::new();
    let path = ws.tractogram("tracts.vtk", &through_triangle());
    let bin = ws.path("v.bin");
    fs::write(&bin, [1.0f32, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<_>>()).unwrap();
    let before = fs::read(&path).unwrap();

    let cfg = RunConfig {
        time_limit: Some(Duration::from_nanos(1)),
        ..config(1)
    };
    assert!(matches!(
        run_field_import(&import(&path, &bin, "v", false), &cfg),
        Err(CommandError::TimeLimitExceeded(_))
    ));
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(!read_tractogram(&path).unwrap().fields().contains("v"));
}

#[test]
fn import_round_trip_is_bit_exact() {
    let ws = Workspace::new();
    let t = random_walk_tractogram(5, 6, 8, 3.0, 0.4);
    let path = ws.tractogram("tracts.vtk", &t);
    let values: Vec<u8> = (0..t.point_count())
        .flat_map(|i| (i as f32 * 1.25 - 7.0).to_le_bytes())
        .collect();
    let bin = ws.path("fa.bin");
    fs::write(&bin, &values).unwrap();

    let outcome = run_field_import(&import(&path, &bin, "fa", false), &config(1)).unwrap();
    assert_eq!(outcome, Outcome::Written { path: path.clone() });

    let back = read_tractogram(&path).unwrap();
    assert_eq!(back.points(), t.points());
    let fa = back.fields().get("fa").unwrap();
    assert_eq!(fa.owner(), FieldOwner::Point);
    assert_eq!(fa.data().to_le_bytes(), values);
}

#[test]
fn duplicate_import_without_force_leaves_file_untouched() {
    let ws = Workspace::new();
    let t = through_triangle();
    let path = ws.tractogram("tracts.vtk", &t);
    let bin = ws.path("v.bin");
    fs::write(&bin, [1.0f32, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<_>>()).unwrap();
    run_field_import(&import(&path, &bin, "v", false), &config(1)).unwrap();
    let before = fs::read(&path).unwrap();

    fs::write(&bin, [3.0f32, 4.0].iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<_>>()).unwrap();
    assert!(matches!(
        run_field_import(&import(&path, &bin, "v", false), &config(1)),
        Err(CommandError::Conflict { .. })
    ));
    assert_eq!(fs::read(&path).unwrap(), before);

    run_field_import(&import(&path, &bin, "v", true), &config(1)).unwrap();
    let back = read_tractogram(&path).unwrap();
    assert_eq!(back.fields().len(), 1);
    assert_eq!(back.fields().get("v").unwrap().floats().unwrap(), &[3.0, 4.0]);
}

#[test]
fn wrong_size_field_file_is_rejected() {
    let ws = Workspace::new();
    let path = ws.tractogram("tracts.vtk", &through_triangle());
    let bin = ws.path("short.bin");
    fs::write(&bin, [0u8; 6]).unwrap();
    let before = fs::read(&path).unwrap();
    assert!(matches!(
        run_field_import(&import(&path, &bin, "v", false), &config(1)),
        Err(CommandError::Field(_))
    ));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn bad_tokens_are_validation_errors() {
    let ws = Workspace::new();
    let path = ws.tractogram("tracts.vtk", &through_triangle());
    let bin = ws.path("v.bin");
    fs::write(&bin, [0u8; 8]).unwrap();

    let mut req = import(&path, &bin, "v", false);
    req.owner = "VERTEX".into();
    assert!(matches!(run_field_import(&req, &config(1)), Err(CommandError::Validation { .. })));

    let mut req = import(&path, &bin, "v", false);
    req.datatype = "double".into();
    assert!(matches!(run_field_import(&req, &config(1)), Err(CommandError::Validation { .. })));

    let mut req = import(&path, &bin, "v", false);
    req.dimension = 0;
    assert!(matches!(run_field_import(&req, &config(1)), Err(CommandError::Validation { .. })));

    let req = import(&path, &bin, "values.csv", false);
    assert!(matches!(run_field_import(&req, &config(1)), Err(CommandError::Validation { .. })));
}

#[test]
fn tck_cannot_receive_fields() {
    let ws = Workspace::new();
    let path = ws.tractogram("tracts.tck", &through_triangle());
    let bin = ws.path("v.bin");
    fs::write(&bin, [0u8; 8]).unwrap();
    assert!(matches!(
        run_field_import(&import(&path, &bin, "v", false), &config(1)),
        Err(CommandError::Validation { .. })
    ));
}

#[test]
fn streamline_int_field() {
    let ws = Workspace::new();
    let t = random_walk_tractogram(2, 3, 4, 1.0, 0.1);
    let path = ws.tractogram("tracts.vtk", &t);
    let bin = ws.path("ids.bin");
    fs::write(&bin, [7i32, -8, 9].iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<_>>()).unwrap();
    let req = FieldImportRequest {
        owner: "STREAMLINE".into(),
        datatype: "int".into(),
        ..import(&path, &bin, "id", false)
    };
    run_field_import(&req, &config(2)).unwrap();
    let back = read_tractogram(&path).unwrap();
    assert_eq!(back.fields().get("id").unwrap().ints().unwrap(), &[7, -8, 9]);
}
