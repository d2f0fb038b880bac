use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
    pub expanded: bool,
}

/// FAQ list where every item opens and closes on its own.
#[derive(Debug, Clone, Default)]
pub struct Accordion {
    items: Vec<FaqItem>,
}

impl Accordion {
    pub fn new<I, Q, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<String>,
        A: Into<String>,
    {
        Self {
            items: entries
                .into_iter()
                .map(|(q, a)| FaqItem {
                    question: q.into(),
                    answer: a.into(),
                    expanded: false,
                })
                .collect(),
        }
    }

    pub fn with_default_questions() -> Self {
        Self::new(DEFAULT_FAQ.iter().copied())
    }

    /// Flips one item and returns its new state, or `None` if the index is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.expanded = !item.expanded;
        Some(item.expanded)
    }

    pub fn items(&self) -> &[FaqItem] {
        &self.items
    }
}

const DEFAULT_FAQ: [(&str, &str); 4] = [
    (
        "Who is this course for?",
        "Anyone with basic Python and high-school mathematics who wants a structured path into AI and Machine Learning.",
    ),
    (
        "How long does the course take?",
        "Twelve weeks at roughly 8-10 hours of study per week.",
    ),
    (
        "Do I get a certificate?",
        "Yes. Completing every module and the capstone project earns a certificate of completion.",
    ),
    (
        "Can I study at my own pace?",
        "Lessons are recorded, so you can follow them whenever suits you within the enrollment period.",
    ),
];
