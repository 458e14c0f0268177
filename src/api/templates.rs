//! Chat page markup and the user/bot message-bubble fragments.
//!
//! Each bubble template carries a single `{{MSG}}` placeholder. Message text
//! is HTML-escaped before substitution, so attacker-controlled content cannot
//! inject markup.

use crate::domain::Exchange;

pub const PLACEHOLDER: &str = "{{MSG}}";

pub const CSS: &str = r#"
.chat-message {
    padding: 1.5rem; border-radius: 0.5rem; margin-bottom: 1rem; display: flex
}
.chat-message.user {
    background-color: #2b313e
}
.chat-message.bot {
    background-color: #475063
}
.chat-message .avatar {
    width: 20%;
    font-size: 2.5rem;
    text-align: center;
}
.chat-message .message {
    width: 80%;
    padding: 0 1.5rem;
    color: #fff;
    white-space: pre-wrap;
}
"#;

pub const USER_TEMPLATE: &str = r#"
<div class="chat-message user">
    <div class="avatar">&#129489;</div>
    <div class="message">{{MSG}}</div>
</div>
"#;

pub const BOT_TEMPLATE: &str = r#"
<div class="chat-message bot">
    <div class="avatar">&#129302;</div>
    <div class="message">{{MSG}}</div>
</div>
"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn render(template: &str, message: &str) -> String {
    template.replace(PLACEHOLDER, &escape_html(message))
}

pub fn render_user(message: &str) -> String {
    render(USER_TEMPLATE, message)
}

pub fn render_bot(message: &str) -> String {
    render(BOT_TEMPLATE, message)
}

/// Renders a question/answer pair as alternating bubbles.
pub fn render_exchange(exchange: &Exchange) -> String {
    let mut html = render_user(&exchange.question);
    if let Some(answer) = &exchange.answer {
        html.push_str(&render_bot(answer));
    }
    html
}

pub fn render_history(exchanges: &[Exchange]) -> String {
    exchanges.iter().map(render_exchange).collect()
}

/// The single-page chat UI: header, question input, and a sidebar for
/// uploading PDFs and triggering processing.
pub fn chat_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Chat with multiple PDFs</title>
<style>
body {{ font-family: sans-serif; background-color: #0e1117; color: #fafafa; margin: 0; display: flex; }}
.sidebar {{ width: 21rem; min-height: 100vh; background-color: #262730; padding: 1.5rem; }}
.main {{ flex: 1; padding: 2rem 4rem; max-width: 50rem; }}
h1, h3 {{ color: #fafafa; }}
input[type="text"] {{ width: 100%; padding: 0.5rem; background: #262730; color: #fafafa; border: 1px solid #4b4b54; border-radius: 0.25rem; }}
button {{ margin-top: 0.75rem; padding: 0.5rem 1rem; border: none; border-radius: 0.25rem; background: #ff4b4b; color: #fff; cursor: pointer; }}
.status {{ margin-top: 0.75rem; color: #9e9e9e; }}
{css}
</style>
</head>
<body>
<div class="sidebar">
  <h3>Your documents</h3>
  <p>Upload your PDFs here and click on 'Process'</p>
  <input type="file" id="files" multiple accept="application/pdf">
  <button id="process">Process</button>
  <div class="status" id="status"></div>
</div>
<div class="main">
  <h1>Chat with multiple PDFs &#128218;</h1>
  <input type="text" id="question" placeholder="Ask a question about your documents:">
  <div id="messages"></div>
</div>
<script>
let sessionId = null;

async function ensureSession() {{
  if (sessionId) return sessionId;
  const res = await fetch('/api/v1/sessions', {{ method: 'POST' }});
  const body = await res.json();
  sessionId = body.session_id;
  return sessionId;
}}

document.getElementById('process').addEventListener('click', async () => {{
  const status = document.getElementById('status');
  const files = document.getElementById('files').files;
  if (!files.length) {{ status.textContent = 'Choose at least one PDF first.'; return; }}
  status.textContent = 'Processing';
  const id = await ensureSession();
  const form = new FormData();
  for (const file of files) form.append('documents', file, file.name);
  const res = await fetch(`/api/v1/sessions/${{id}}/process`, {{ method: 'POST', body: form }});
  const body = await res.json();
  if (!res.ok) {{ status.textContent = body.error; return; }}
  status.textContent = `Indexed ${{body.chunk_count}} chunks from ${{body.documents.length}} document(s).`;
  document.getElementById('messages').innerHTML = '';
}});

document.getElementById('question').addEventListener('keydown', async (event) => {{
  if (event.key !== 'Enter') return;
  const input = event.target;
  const question = input.value.trim();
  if (!question) return;
  input.value = '';
  const id = await ensureSession();
  const res = await fetch(`/api/v1/sessions/${{id}}/chat`, {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ question }}),
  }});
  const body = await res.json();
  const messages = document.getElementById('messages');
  if (!res.ok) {{ document.getElementById('status').textContent = body.error; return; }}
  messages.insertAdjacentHTML('beforeend', body.user_html);
  messages.insertAdjacentHTML('beforeend', body.bot_html);
}});
</script>
</body>
</html>
"#,
        css = CSS
    )
}
