//! HTML rendering for the form and output pane

use tner_extractor::output::escape_html;

use crate::handlers::form::RunForm;

const STYLE: &str = r#"
body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 2rem auto; max-width: 48rem; }
fieldset { border: 1px solid #ccc; border-radius: 0.4rem; margin-bottom: 1rem; }
label { display: block; margin: 0.4rem 0; }
input[type=text] { width: 100%; box-sizing: border-box; padding: 0.3rem; }
pre#output { background: #111; color: #eee; padding: 1rem; min-height: 12rem; max-height: 24rem; overflow-y: auto; white-space: pre-wrap; }
"#;

fn checked(enabled: bool) -> &'static str {
    if enabled {
        " checked"
    } else {
        ""
    }
}

/// Script raising a browser alert with `message`
fn alert_script(message: &str) -> String {
    let literal = serde_json::to_string(message)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    format!("<script>window.alert({literal});</script>\n")
}

/// Form, output pane and optional popup
pub fn render_page(form: &RunForm, output: &[String], popup: Option<&str>) -> String {
    let pane = output
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("\n");
    let script = popup.map(alert_script).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Letter NER</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Named entities in a TEI letter</h1>
<form method="post" action="/run">
<fieldset>
<legend>Source</legend>
<label>TEI-XML file <input type="text" name="source" value="{source}" placeholder="/path/to/letter.xml"></label>
</fieldset>
<fieldset>
<legend>Output</legend>
<label><input type="checkbox" name="write_json"{json_checked}> Write JSON</label>
<label>JSON folder <input type="text" name="json_dir" value="{json_dir}"></label>
<label><input type="checkbox" name="write_html"{html_checked}> Write HTML visualization</label>
<label>HTML folder <input type="text" name="html_dir" value="{html_dir}"></label>
<label>Title <input type="text" name="title" value="{title}"></label>
</fieldset>
<button type="submit">Submit</button>
</form>
<h2>Output</h2>
<pre id="output">{pane}</pre>
{script}</body>
</html>
"#,
        source = escape_html(&form.source),
        json_checked = checked(form.json_enabled()),
        json_dir = escape_html(&form.json_dir),
        html_checked = checked(form.html_enabled()),
        html_dir = escape_html(&form.html_dir),
        title = escape_html(&form.title),
    )
}
