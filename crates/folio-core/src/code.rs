//! Code editor animation.
//!
//! Types a fixed script into the editor surface one character at a time,
//! numbering lines in the gutter, then swaps each finished line for its
//! syntax-highlighted markup. After the last line it holds, fades out and
//! starts over. The first cycle waits until the editor is on screen.
//!
//! ```text
//! ┌ line-numbers ┐┌ code-content ─────────────────────────────┐
//! │ 1            ││ <span class="comment"># Análise …</span>  │  ← markup (done)
//! │ 2            ││ import pand▌                              │  ← plain + cursor
//! └──────────────┘└───────────────────────────────────────────┘
//! ```

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{ms, CodeAnimationConfig};
use crate::dom::{Element, NodeId, SharedDocument};
use crate::task::sleep_or_cancel;

/// Class toggled on the editor while it fades out between cycles
pub const FADING_CLASS: &str = "fading-out";

/// One line of the script: what gets typed, and what replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLine {
    pub text: String,
    pub markup: String,
}

impl CodeLine {
    pub fn new(text: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: markup.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new("", "")
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

fn span(class: &str, text: &str) -> String {
    format!("<span class=\"{class}\">{text}</span>")
}

/// The sales-analysis script shown on the portfolio hero.
pub fn default_script() -> Vec<CodeLine> {
    let kw = |t: &str| span("keyword", t);
    let m = |t: &str| span("module", t);
    let v = |t: &str| span("variable", t);
    let f = |t: &str| span("function", t);
    let s = |t: &str| span("string", t);
    let c = |t: &str| span("comment", t);
    let cls = |t: &str| span("class", t);
    let p = |t: &str| span("property", t);

    vec![
        CodeLine::new(
            "# Análise exploratória de dados de vendas",
            c("# Análise exploratória de dados de vendas"),
        ),
        CodeLine::new(
            "import pandas as pd",
            format!("{} {} {} {}", kw("import"), m("pandas"), kw("as"), m("pd")),
        ),
        CodeLine::new(
            "import numpy as np",
            format!("{} {} {} {}", kw("import"), m("numpy"), kw("as"), m("np")),
        ),
        CodeLine::new(
            "import matplotlib.pyplot as plt",
            format!(
                "{} {} {} {}",
                kw("import"),
                m("matplotlib.pyplot"),
                kw("as"),
                m("plt")
            ),
        ),
        CodeLine::new(
            "from sklearn.linear_model import LinearRegression",
            format!(
                "{} {} {} {}",
                kw("from"),
                m("sklearn.linear_model"),
                kw("import"),
                cls("LinearRegression")
            ),
        ),
        CodeLine::blank(),
        CodeLine::new(
            "# Carregamento e preparação dos dados",
            c("# Carregamento e preparação dos dados"),
        ),
        CodeLine::new(
            "df = pd.read_csv('vendas_2024.csv')",
            format!(
                "{} = {}.{}({})",
                v("df"),
                m("pd"),
                f("read_csv"),
                s("'vendas_2024.csv'")
            ),
        ),
        CodeLine::new(
            "df['data'] = pd.to_datetime(df['data'])",
            format!(
                "{}[{}] = {}.{}({}[{}])",
                v("df"),
                s("'data'"),
                m("pd"),
                f("to_datetime"),
                v("df"),
                s("'data'")
            ),
        ),
        CodeLine::new(
            "vendas_mensais = df.groupby(df['data'].dt.month)['valor'].sum()",
            format!(
                "{} = {}.{}({}[{}].{}.{})[{}].{}()",
                v("vendas_mensais"),
                v("df"),
                f("groupby"),
                v("df"),
                s("'data'"),
                p("dt"),
                p("month"),
                s("'valor'"),
                f("sum")
            ),
        ),
        CodeLine::blank(),
        CodeLine::new(
            "# Análise estatística e predição",
            c("# Análise estatística e predição"),
        ),
        CodeLine::new(
            "modelo = LinearRegression().fit(X, y)",
            format!(
                "{} = {}().{}({}, {})",
                v("modelo"),
                cls("LinearRegression"),
                f("fit"),
                v("X"),
                v("y")
            ),
        ),
        CodeLine::new(
            "previsao = modelo.predict(X_futuro)",
            format!(
                "{} = {}.{}({})",
                v("previsao"),
                v("modelo"),
                f("predict"),
                v("X_futuro")
            ),
        ),
        CodeLine::new(
            "plt.plot(vendas_mensais).show()",
            format!(
                "{}.{}({}).{}()",
                m("plt"),
                f("plot"),
                v("vendas_mensais"),
                f("show")
            ),
        ),
    ]
}

/// Fires once, the first time the observed ratio reaches the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityGate {
    target: NodeId,
    threshold: f64,
    fired: bool,
}

impl VisibilityGate {
    pub fn new(target: NodeId, threshold: f64) -> Self {
        Self {
            target,
            threshold,
            fired: false,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Returns `true` exactly once: on the first qualifying observation.
    pub fn observe(&mut self, ratio: f64) -> bool {
        if self.fired || ratio <= 0.0 || ratio < self.threshold {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Types the script into the editor, forever (until cancelled).
pub struct CodeAnimator {
    doc: SharedDocument,
    editor: Option<NodeId>,
    content: NodeId,
    gutter: NodeId,
    config: CodeAnimationConfig,
    rng: StdRng,
}

impl CodeAnimator {
    /// Bind to `.code-content` and `.line-numbers` (and `.code-editor` if present).
    pub fn attach(doc: SharedDocument, config: &CodeAnimationConfig) -> Option<Self> {
        let (editor, content, gutter) = {
            let d = doc.read();
            (
                d.first_by_class("code-editor"),
                d.first_by_class("code-content"),
                d.first_by_class("line-numbers"),
            )
        };
        let (Some(content), Some(gutter)) = (content, gutter) else {
            debug!("Code editor surface missing, animation disabled");
            return None;
        };
        Some(Self {
            doc,
            editor,
            content,
            gutter,
            config: config.clone(),
            rng: StdRng::from_os_rng(),
        })
    }

    /// Use a fixed seed for the per-character jitter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Gate that starts the animation when the editor becomes visible.
    pub fn gate(&self) -> VisibilityGate {
        VisibilityGate::new(self.editor.unwrap_or(self.content), self.config.start_threshold)
    }

    /// Delay after typing one character: base ± uniform jitter.
    pub fn char_delay(&mut self) -> Duration {
        let base = self.config.char_delay_ms as i64 * 1000;
        let jitter = self.config.jitter_ms as i64 * 1000;
        let offset = if jitter > 0 {
            self.rng.random_range(-jitter..=jitter)
        } else {
            0
        };
        Duration::from_micros((base + offset).max(0) as u64)
    }

    /// Run cycles until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut cycles = 0u64;
        while self.run_cycle(&cancel).await {
            cycles += 1;
            debug!(cycles, "Code animation cycle complete");
        }
        debug!(cycles, "Code animation stopped");
    }

    /// One full pass over the script including the hold and fade.
    ///
    /// Returns `false` if cancelled part-way.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) -> bool {
        {
            let mut doc = self.doc.write();
            doc.clear_children(self.content);
            doc.clear_children(self.gutter);
            if let Some(editor) = self.editor {
                doc.update(editor, |el| el.remove_class(FADING_CLASS));
            }
        }

        let lines = self.config.lines.clone();
        for (i, line) in lines.iter().enumerate() {
            let row = {
                let mut doc = self.doc.write();
                doc.append(self.gutter, Element::new("span").with_text((i + 1).to_string()));
                let row = doc.append(self.content, Element::new("div").with_class("code-line"));
                doc.append(row, Element::new("span").with_class("typing-cursor"));
                row
            };

            for ch in line.text.chars() {
                self.doc.write().update(row, |el| el.push_char(ch));
                let delay = self.char_delay();
                if !sleep_or_cancel(cancel, delay).await {
                    return false;
                }
            }
            self.doc.write().set_markup(row, line.markup.clone());

            let pause = if line.is_blank() {
                self.config.blank_line_pause_ms
            } else {
                self.config.line_pause_ms
            };
            if !sleep_or_cancel(cancel, ms(pause)).await {
                return false;
            }
        }

        if !sleep_or_cancel(cancel, ms(self.config.hold_ms)).await {
            return false;
        }
        if let Some(editor) = self.editor {
            self.doc
                .write()
                .update(editor, |el| el.add_class(FADING_CLASS));
        }
        sleep_or_cancel(cancel, ms(self.config.fade_ms)).await
    }
}
