use serde::Serialize;

const SHOW_LABEL: &str = "Show Preview Content";
const HIDE_LABEL: &str = "Hide Preview Content";

#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewPanel {
    visible: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PreviewView {
    pub visible: bool,
    pub button_label: &'static str,
}

impl PreviewPanel {
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn view(&self) -> PreviewView {
        PreviewView {
            visible: self.visible,
            button_label: if self.visible { HIDE_LABEL } else { SHOW_LABEL },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden_and_flips_label() {
        let mut panel = PreviewPanel::default();
        assert_eq!(panel.view().button_label, SHOW_LABEL);
        assert!(panel.toggle());
        assert_eq!(
            panel.view(),
            PreviewView {
                visible: true,
                button_label: HIDE_LABEL
            }
        );
        assert!(!panel.toggle());
    }
}
