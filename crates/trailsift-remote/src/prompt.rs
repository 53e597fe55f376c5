//! Prompt sent to the completion service.

/// Instructions preceding the raw export. The field names mirror
/// `AuditRecord`; the repair step also accepts the column names a
/// document-management export uses (`user`, `document`, `folder`, `details`).
const INSTRUCTIONS: &str = r#"You are given an audit-trail export from a document-management system.
Return ONLY a JSON object, with no commentary, in exactly this shape:

{
  "entries": [
    {
      "timestamp": "YYYY-MM-DD HH:MM:SS or null",
      "actor": "who performed the action",
      "action": "what was done",
      "resource": "document or file name",
      "container": "folder path",
      "detail": "any remaining text",
      "application": "source application or null",
      "category": "missing_resource | deletion | file_operation | security_event | system_event | other"
    }
  ],
  "statistics": {
    "total_entries": 0,
    "categories": {},
    "top_actors": [],
    "top_resources": []
  }
}

Produce one entry per data row, in the order the rows appear. Use null for
anything you cannot determine. Do not invent rows.

Audit trail:
"#;

/// Build the full prompt for `content`.
pub fn build_prompt(content: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + content.len() + 1);
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(content.trim_end());
    prompt.push('\n');
    prompt
}
