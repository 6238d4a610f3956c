use chrono::Local;

use sheetreport_core::{Completion, Outcome};

use super::App;

impl App {
    /// Fold a finished request into the workflow and queue any follow-ups.
    pub fn handle_completion(&mut self, completion: Completion) {
        let epoch = self.workflow.epoch();
        let current = completion.epoch == epoch;
        let refreshed = current && matches!(completion.outcome, Outcome::FilesLoaded(Ok(_)));
        let uploaded = current
            && matches!(
                completion.outcome,
                Outcome::Uploaded { result: Ok(()), .. }
            );

        let follow_up = self.workflow.apply(completion);
        self.outbox.extend(follow_up);

        let reset = self.workflow.epoch() != epoch;
        if reset {
            self.files_refreshed_at = None;
            self.sheet_cursor = 0;
        }
        if refreshed && !reset {
            self.files_refreshed_at = Some(Local::now());
        }
        if uploaded && !self.upload_path.is_editing() {
            self.upload_path.clear();
        }

        self.sync();
        if refreshed || reset {
            self.follow_selection();
        }
    }
}
