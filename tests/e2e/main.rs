//! End-to-end scenarios for the LeanLog core.
