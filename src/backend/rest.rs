//! Client for the timeline web service's JSON API.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use super::{EtpUpdate, ProjectBackend};
use crate::error::BackendError;
use crate::forms::{ProjectDraft, TaskDraft};
use crate::model::{Project, ProjectId, Task, TaskId, Workspace};

#[derive(Debug)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/project/api/{}", self.base_url, path)
    }

    /// Send and turn any non-2xx status into [`BackendError::Api`].
    fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        if status.is_success() {
            return Ok(body);
        }
        tracing::warn!(status = status.as_u16(), "request rejected by server");
        Err(BackendError::Api {
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason().unwrap_or("request failed")),
        })
    }
}

impl ProjectBackend for RestBackend {
    fn describe(&self) -> String {
        format!("Server {}", self.base_url)
    }

    fn load(&mut self) -> Result<Workspace, BackendError> {
        let url = self.url("projects");
        tracing::debug!(%url, "fetching projects");
        let body = self.send(self.client.get(&url))?;
        Ok(Workspace {
            projects: parse_projects(&body)?,
            etp_entries: Vec::new(),
        })
    }

    fn create_project(&mut self, draft: &ProjectDraft) -> Result<(), BackendError> {
        self.send(self.client.post(self.url("projects")).json(draft))?;
        Ok(())
    }

    fn update_project(&mut self, id: ProjectId, draft: &ProjectDraft) -> Result<(), BackendError> {
        self.send(self.client.put(self.url(&format!("projects/{id}"))).json(draft))?;
        Ok(())
    }

    fn delete_project(&mut self, id: ProjectId) -> Result<(), BackendError> {
        self.send(self.client.delete(self.url(&format!("projects/{id}"))))?;
        Ok(())
    }

    fn create_task(&mut self, draft: &TaskDraft) -> Result<(), BackendError> {
        self.send(self.client.post(self.url("tasks")).json(draft))?;
        Ok(())
    }

    fn update_task(&mut self, id: TaskId, draft: &TaskDraft) -> Result<(), BackendError> {
        self.send(self.client.put(self.url(&format!("tasks/{id}"))).json(draft))?;
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> Result<(), BackendError> {
        self.send(self.client.delete(self.url(&format!("tasks/{id}"))))?;
        Ok(())
    }

    fn update_etp(&mut self, update: &EtpUpdate) -> Result<(), BackendError> {
        let body = json!({
            "project": update.project,
            "period": update.period,
            "etp": update.etp,
        });
        self.send(self.client.post(self.url("update_etp")).json(&body))?;
        Ok(())
    }
}

// ── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Envelope {
    data: ProjectList,
}

#[derive(Deserialize)]
struct ProjectList {
    projects: Vec<ProjectRecord>,
}

#[derive(Deserialize)]
struct ProjectRecord {
    id: u64,
    name: String,
    #[serde(default)]
    color_scheme: Option<String>,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
}

#[derive(Deserialize)]
struct TaskRecord {
    id: u64,
    #[serde(default)]
    project_id: Option<u64>,
    text: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    raw_start_date: Option<String>,
    #[serde(default)]
    raw_end_date: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    etp: Option<f64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode the `GET /projects` envelope into model projects.
pub fn parse_projects(body: &str) -> Result<Vec<Project>, BackendError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    envelope
        .data
        .projects
        .into_iter()
        .map(|record| {
            let project_id = ProjectId(record.id);
            let tasks = record
                .tasks
                .into_iter()
                .map(|t| task_from_record(t, project_id))
                .collect::<Result<Vec<_>, _>>()?;
            let mut project = Project::new(project_id, record.name);
            if let Some(scheme) = record.color_scheme.filter(|s| !s.is_empty()) {
                project.color_scheme = scheme;
            }
            project.tasks = tasks;
            Ok(project)
        })
        .collect()
}

fn task_from_record(record: TaskRecord, owner: ProjectId) -> Result<Task, BackendError> {
    let start = record_date(record.raw_start_date.as_deref(), record.start_date.as_deref())
        .ok_or_else(|| BackendError::Malformed(format!("task {} has no start date", record.id)))?;
    let end = record_date(record.raw_end_date.as_deref(), record.end_date.as_deref())
        .ok_or_else(|| BackendError::Malformed(format!("task {} has no end date", record.id)))?;

    let mut task = Task::new(
        TaskId(record.id),
        record.project_id.map(ProjectId).unwrap_or(owner),
        record.text,
        start,
        end,
    );
    task.comment = record.comment.filter(|c| !c.trim().is_empty());
    task.color = record.color;
    task.etp = record.etp;
    Ok(task)
}

/// ISO date when present, otherwise the `DD/MM/YYYY` display date.
fn record_date(raw: Option<&str>, display: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .or_else(|| display.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()))
}

/// The `error` or `message` field of a JSON error body, else `fallback`.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECTS: &str = r#"{
        "status": "success",
        "data": {
            "projects": [
                {
                    "id": 3,
                    "name": "EUS",
                    "color_scheme": "green",
                    "tasks": [
                        {
                            "id": 11,
                            "project_id": 3,
                            "text": "RFP",
                            "comment": "",
                            "start_date": "01/05/2025",
                            "end_date": "01/09/2025",
                            "raw_start_date": "2025-05-01",
                            "raw_end_date": "2025-09-01",
                            "color": "green-500",
                            "etp": 3.0,
                            "start": 26.7,
                            "width": 15
                        },
                        {
                            "id": 12,
                            "text": "Pilot & Deploy",
                            "comment": "staged rollout",
                            "start_date": "01/09/2025",
                            "end_date": "30/12/2025"
                        }
                    ]
                },
                { "id": 4, "name": "TOM" }
            ]
        }
    }"#;

    #[test]
    fn decodes_the_projects_envelope() {
        let projects = parse_projects(PROJECTS).unwrap();
        assert_eq!(projects.len(), 2);

        let eus = &projects[0];
        assert_eq!(eus.id, ProjectId(3));
        assert_eq!(eus.color_scheme, "green");
        assert_eq!(eus.tasks.len(), 2);

        let rfp = &eus.tasks[0];
        assert_eq!(rfp.start, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(rfp.comment, None);
        assert_eq!(rfp.etp, Some(3.0));
        assert_eq!(rfp.color.as_deref(), Some("green-500"));

        let pilot = &eus.tasks[1];
        assert_eq!(pilot.project_id, ProjectId(3));
        assert_eq!(pilot.end, NaiveDate::from_ymd_opt(2025, 12, 30).unwrap());
        assert_eq!(pilot.comment.as_deref(), Some("staged rollout"));
        assert_eq!(pilot.etp, None);

        assert_eq!(projects[1].color_scheme, "blue");
        assert!(projects[1].tasks.is_empty());
    }

    #[test]
    fn tasks_without_dates_are_malformed() {
        let body = r#"{"data":{"projects":[{"id":1,"name":"X","tasks":[{"id":2,"text":"t"}]}]}}"#;
        assert!(matches!(
            parse_projects(body),
            Err(BackendError::Malformed(_))
        ));
    }

    #[test]
    fn error_bodies_surface_their_message() {
        assert_eq!(
            error_message(r#"{"error":"Project name already exists"}"#, "Bad Request"),
            "Project name already exists"
        );
        assert_eq!(
            error_message(r#"{"status":"error","message":"could not convert"}"#, "Bad Request"),
            "could not convert"
        );
        assert_eq!(error_message("<html>oops</html>", "Bad Request"), "Bad Request");
    }

    #[test]
    fn base_url_is_normalized() {
        let backend = RestBackend::new(" http://localhost:5000/ ").unwrap();
        assert_eq!(backend.url("tasks/4"), "http://localhost:5000/project/api/tasks/4");
        assert_eq!(backend.describe(), "Server http://localhost:5000");
    }

    #[test]
    fn task_drafts_serialize_with_iso_dates() {
        let draft = TaskDraft {
            project_id: ProjectId(2),
            text: "Audit".into(),
            comment: None,
            start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            etp: 1.5,
            color: None,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["project_id"], 2);
        assert_eq!(value["start_date"], "2025-02-01");
        assert_eq!(value["end_date"], "2025-04-30");
        assert_eq!(value["etp"], 1.5);
        assert!(value.get("color").is_none());
    }
}
