/// A high-level action produced from key state.
///
/// The frame driver consumes actions, never raw keys, so rebinding keys does
/// not touch camera or object logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Decrease the orbit angle while held.
    OrbitLeft,
    /// Increase the orbit angle while held.
    OrbitRight,
    /// Move the camera closer to the target while held.
    ZoomIn,
    /// Move the camera away from the target while held.
    ZoomOut,
    /// Double camera speed while held.
    Boost,
    /// Translate the moving object along world +X while held.
    ObjectRight,
    /// Translate the moving object along world -X while held.
    ObjectLeft,
    /// Translate the moving object along world -Z while held.
    ObjectForward,
    /// Translate the moving object along world +Z while held.
    ObjectBack,
    /// Translate the moving object along world +Y while held.
    ObjectUp,
    /// Translate the moving object along world -Y while held.
    ObjectDown,
    /// Show or hide (and release or capture) the cursor.
    ToggleCursor,
    /// Switch between filled and wireframe polygons.
    ToggleWireframe,
    /// Log the current cursor position.
    LogCursor,
    /// Switch the camera between automatic and manual orbit.
    ToggleCameraMode,
    /// Request the window to close.
    Quit,
}

impl Action {
    /// Whether this action is a one-shot that must be edge-triggered.
    pub fn is_one_shot(self) -> bool {
        matches!(
            self,
            Action::ToggleCursor
                | Action::ToggleWireframe
                | Action::LogCursor
                | Action::ToggleCameraMode
                | Action::Quit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_are_one_shot() {
        assert!(Action::ToggleCursor.is_one_shot());
        assert!(Action::ToggleWireframe.is_one_shot());
        assert!(Action::LogCursor.is_one_shot());
        assert!(Action::ToggleCameraMode.is_one_shot());
        assert!(Action::Quit.is_one_shot());
    }

    #[test]
    fn movement_is_continuous() {
        assert!(!Action::OrbitLeft.is_one_shot());
        assert!(!Action::ZoomOut.is_one_shot());
        assert!(!Action::Boost.is_one_shot());
        assert!(!Action::ObjectUp.is_one_shot());
    }
}
