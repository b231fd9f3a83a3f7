#[cfg(test)]
mod model_tests {
    use jiff::{Timestamp, civil::date};

    use crate::{
        error::EngineError,
        models::{
            Activity, ActivityType, ExecutionReport, ExecutionStatus, RunCounts, RunFilter,
            SearchRequest, SearchStatus, WorkflowExecution,
        },
    };

    fn create_test_execution(status: ExecutionStatus, completed: u32, total: u32) -> WorkflowExecution {
        WorkflowExecution {
            id: 7,
            activity_id: 3,
            status,
            total_steps: total,
            steps_completed: completed,
            current_step: Some("Fill Location".to_string()),
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
            started_at: None,
            completed_at: None,
            error_message: None,
        }
    }

    fn create_test_request() -> SearchRequest {
        SearchRequest {
            query: "a quiet hotel in Lisbon".to_string(),
            location: "Lisbon".to_string(),
            start_date: date(2025, 7, 14),
            end_date: date(2025, 7, 18),
            adult_count: 2,
            child_count: 1,
            activity_type: ActivityType::Accommodation,
        }
    }

    #[test]
    fn test_execution_status_round_trips_through_str() {
        for status in [
            ExecutionStatus::Pending,
            ExecutionStatus::Running,
            ExecutionStatus::Completed,
            ExecutionStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ExecutionStatus>(), Ok(status));
        }
        assert_eq!("running".parse::<ExecutionStatus>(), Ok(ExecutionStatus::Running));
        assert!("stalled".parse::<ExecutionStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ExecutionStatus::Pending.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&ExecutionStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
        let json = serde_json::to_string(&SearchStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }

    #[test]
    fn test_progress_without_steps_is_zero() {
        let execution = create_test_execution(ExecutionStatus::Pending, 0, 0);
        assert_eq!(execution.progress(), 0.0);

        let report = ExecutionReport::from(&execution);
        assert_eq!(report.progress, 0.0);
        assert_eq!(report.percent(), 0);
    }

    #[test]
    fn test_progress_ratio() {
        let execution = create_test_execution(ExecutionStatus::Running, 3, 9);
        let report = ExecutionReport::from(&execution);
        assert!((report.progress - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.percent(), 33);
        assert_eq!(report.activity_id, 3);
        assert_eq!(report.current_step.as_deref(), Some("Fill Location"));
    }

    #[test]
    fn test_valid_request() {
        assert!(create_test_request().validate().is_ok());
    }

    #[test]
    fn test_request_rejects_empty_location() {
        let request = SearchRequest {
            location: "   ".to_string(),
            ..create_test_request()
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "location"));
    }

    #[test]
    fn test_request_rejects_inverted_dates() {
        let request = SearchRequest {
            end_date: date(2025, 7, 14),
            ..create_test_request()
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "end_date"));
    }

    #[test]
    fn test_request_requires_an_adult() {
        let request = SearchRequest {
            adult_count: 0,
            ..create_test_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_activity_nights() {
        let now = Timestamp::now();
        let activity = Activity {
            id: 1,
            query: String::new(),
            activity_type: ActivityType::Accommodation,
            location: "Lisbon".to_string(),
            start_date: date(2025, 7, 30),
            end_date: date(2025, 8, 2),
            adult_count: 2,
            child_count: 0,
            date_flexible: false,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(activity.nights(), 3);
    }

    #[test]
    fn test_run_filter_parsing_and_status() {
        assert_eq!("all".parse::<RunFilter>().unwrap(), RunFilter::All);
        assert_eq!("Successful".parse::<RunFilter>().unwrap(), RunFilter::Successful);
        assert_eq!("completed".parse::<RunFilter>().unwrap(), RunFilter::Successful);
        assert!("pending".parse::<RunFilter>().is_err());

        assert_eq!(RunFilter::All.status(), None);
        assert_eq!(RunFilter::Failed.status(), Some(ExecutionStatus::Failed));
        assert_eq!(RunFilter::Running.status(), Some(ExecutionStatus::Running));
        assert_eq!(RunFilter::default(), RunFilter::All);
    }

    #[test]
    fn test_run_counts_by_filter() {
        let counts = RunCounts {
            all: 6,
            successful: 3,
            failed: 2,
            running: 1,
        };
        assert_eq!(counts.get(RunFilter::All), 6);
        assert_eq!(counts.get(RunFilter::Successful), 3);
        assert_eq!(counts.get(RunFilter::Failed), 2);
        assert_eq!(counts.get(RunFilter::Running), 1);
    }
}
