//! Integration tests for fleet-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use fleet_robot::RobotState;

    use crate::csv::CsvWriter;
    use crate::row::{RobotSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(robot_id: u32, tick: u64) -> RobotSnapshotRow {
        RobotSnapshotRow {
            tick,
            robot_id,
            state:     RobotState::Idle,
            vertex:    robot_id * 10,
            x:         1.0,
            y:         2.5,
            lane_from: None,
            lane_to:   None,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("robot_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("robot_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "robot_id", "state", "vertex", "x", "y", "lane_from", "lane_to"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["tick", "moving", "waiting", "completed", "deadlocks_resolved"]);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let moving = RobotSnapshotRow {
            state:     RobotState::Moving,
            lane_from: Some(10),
            lane_to:   Some(11),
            ..snap_row(1, 5)
        };
        w.write_snapshots(&[snap_row(0, 5), moving]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("robot_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "5");     // tick
        assert_eq!(&rows[0][2], "idle");
        assert_eq!(&rows[0][4], "1.000"); // x
        assert_eq!(&rows[0][5], "2.500"); // y
        assert_eq!(&rows[0][6], "");      // no lane
        assert_eq!(&rows[1][1], "1");
        assert_eq!(&rows[1][2], "moving");
        assert_eq!(&rows[1][6], "10");
        assert_eq!(&rows[1][7], "11");
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick:               3,
            moving:             2,
            waiting:            1,
            completed:          4,
            deadlocks_resolved: 1,
        }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["3", "2", "1", "4", "1"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }

    #[test]
    fn missing_directory_errors() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("nope")).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use fleet_core::{Point, SimConfig};
    use fleet_graph::NavGraphBuilder;
    use fleet_sim::SimBuilder;

    use crate::{CsvWriter, OutputError, OutputResult, OutputWriter, RobotSnapshotRow, SimOutputObserver, TickSummaryRow};

    /// Fails every write; counts calls.
    #[derive(Default)]
    struct FailingWriter {
        calls: usize,
    }

    impl OutputWriter for FailingWriter {
        fn write_snapshots(&mut self, _rows: &[RobotSnapshotRow]) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other(format!("snapshot {}", self.calls))))
        }

        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other(format!("summary {}", self.calls))))
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn corridor_sim(total_ticks: u64, output_interval_ticks: u64) -> fleet_sim::Sim {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point::new(0.0, 0.0), "a", false);
        let c = b.add_vertex(Point::new(1.0, 0.0), "c", false);
        let d = b.add_vertex(Point::new(2.0, 0.0), "d", false);
        b.add_two_way(a, c, 1.0);
        b.add_two_way(c, d, 1.0);
        let config = SimConfig {
            move_speed: 0.5,
            total_ticks,
            output_interval_ticks,
            ..SimConfig::default()
        };
        let mut sim = SimBuilder::new(config, b.build().unwrap()).build().unwrap();
        let obs = &mut fleet_sim::NoopObserver;
        let r0 = sim.spawn(a, obs).unwrap().unwrap();
        sim.spawn(d, obs).unwrap();
        sim.assign_task_to(r0, c, obs).unwrap();
        sim
    }

    #[test]
    fn integration_csv() {
        let mut sim = corridor_sim(6, 2);
        let dir = tempfile::tempdir().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // output_interval = 2 → snapshots at ticks 0, 2, 4 (3 ticks × 2 robots).
        let mut rdr = csv::Reader::from_path(dir.path().join("robot_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        // Robot 0 departed on tick 0: on lane 0 → 1.
        assert_eq!(&rows[0][2], "moving");
        assert_eq!(&rows[0][6], "0");
        assert_eq!(&rows[0][7], "1");
        // Robot 1 never moves.
        assert_eq!(&rows[1][2], "idle");
        assert_eq!(&rows[1][3], "2");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        // Arrival on the fourth tick (tick 3) completes the task.
        assert_eq!(&rows[2][3], "0");
        assert_eq!(&rows[3][3], "1");
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = corridor_sim(3, 1);
        let mut obs = SimOutputObserver::new(FailingWriter::default());
        sim.run(&mut obs).unwrap();

        let err = obs.take_error().expect("write error stored");
        assert_eq!(err.to_string(), "I/O error: summary 1");
        assert!(obs.take_error().is_none());
        // Writes kept being attempted after the first failure.
        assert_eq!(obs.into_writer().calls, 6);
    }
}
