//! Benchmark document rendering.
//!
//! [`render`] is a pure function from a [`BenchmarkSpec`] to a complete
//! HTML page. The page loads the measurement library from the delivery
//! channel's `/libs/` path, runs both variants through a Benchmark.js
//! suite and reports cycle/completion output on the browser console.
//!
//! Snippet text is interpolated verbatim and never escaped: executing
//! controller-supplied code inside the measurement page is the product,
//! and the page only ever runs in the delivery-channel client that
//! fetched it.

use serde::Deserialize;

/// Inputs for one benchmark session, as carried by `start_benchmark`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSpec {
    /// Runs once before the suite.
    pub setup: String,
    /// Body of the first measured variant.
    pub option_a: String,
    /// Body of the second measured variant.
    pub option_b: String,
    /// Runs once after the suite completes.
    pub teardown: String,
    /// Extra library files to load from `/libs/`, in order.
    #[serde(default)]
    pub libraries: Vec<String>,
}

/// Render the executable measurement document for a spec.
pub fn render(spec: &BenchmarkSpec) -> String {
    let library_scripts = spec
        .libraries
        .iter()
        .map(|src| format!(r#"    <script src="/libs/{src}"></script>"#))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Benchmark Session</title>
    <script src="https://cdn.jsdelivr.net/npm/lodash@4.17.21/lodash.min.js"></script>
    <script src="/libs/benchmark.js"></script>
{library_scripts}
</head>
<body>
    <h1>Benchmark running...</h1>
    <script>
        try {{
            {setup}

            const suite = new Benchmark.Suite();

            suite
                .add('Option A', function () {{
                    {option_a}
                }})
                .add('Option B', function () {{
                    {option_b}
                }})
                .on('cycle', function (event) {{
                    console.log(String(event.target));
                }})
                .on('complete', function () {{
                    console.log('Fastest is ' + this.filter('fastest').map('name'));
                    {teardown}
                }})
                .run({{ async: true }});
        }} catch (error) {{
            console.error('Benchmark error:', error);
        }}
    </script>
</body>
</html>
"#,
        setup = spec.setup,
        option_a = spec.option_a,
        option_b = spec.option_b,
        teardown = spec.teardown,
    )
}
