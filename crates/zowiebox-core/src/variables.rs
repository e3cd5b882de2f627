// ── Variable publication ──
//
// Flattens cached domain state into the flat string-valued namespace the
// host runtime exposes to UI and scripting. Array domains (recording
// tasks, NDI sources) namespace their identifiers by the domain's own
// index field, so the set grows as storage devices and sources appear.
// Publication merges over the previous set and never prunes: an
// identifier that stops arriving keeps its last-known value.

use indexmap::IndexMap;

use zowiebox_api::record::RecordingTask;
use zowiebox_api::streamplay::NdiSource;
use zowiebox_api::video::{InputSignal, OutputInfo};

use crate::model::{AudioProfile, DeviceClock, TallyState};
use crate::store::StateCache;

/// The published variable namespace: identifier → display string.
pub type VariableSet = IndexMap<String, String>;

fn bool_str(flag: u8) -> &'static str {
    if flag == 0 { "false" } else { "true" }
}

fn input_variables(vars: &mut VariableSet, input: &InputSignal) {
    vars.insert("input_hdmi_signal".into(), bool_str(input.hdmi_signal).into());
    vars.insert("input_audio_signal".into(), input.audio_signal.to_string());
    vars.insert("input_width".into(), input.width.to_string());
    vars.insert("input_height".into(), input.height.to_string());
    vars.insert("input_framerate".into(), input.framerate.to_string());
    vars.insert("input_desc".into(), input.desc.clone());
}

fn output_variables(vars: &mut VariableSet, output: &OutputInfo) {
    vars.insert("output_format".into(), output.format.clone());
    vars.insert(
        "output_audio_switch".into(),
        bool_str(output.audio_switch).into(),
    );
    vars.insert(
        "output_loop_out_switch".into(),
        bool_str(output.loop_out_switch).into(),
    );
}

fn audio_variables(vars: &mut VariableSet, audio: &AudioProfile) {
    vars.insert("audio_switch".into(), audio.switch.clone());
    vars.insert("audio_input_type".into(), audio.ai_type.clone());
    vars.insert("audio_codec".into(), audio.codec.clone());
    vars.insert("audio_bitrate".into(), audio.bitrate.clone());
    vars.insert("audio_sample_rate".into(), audio.sample_rate.clone());
    vars.insert("audio_channel".into(), audio.channel.clone());
    vars.insert("audio_volume".into(), audio.volume.to_string());
}

fn clock_variables(vars: &mut VariableSet, clock: &DeviceClock) {
    vars.insert("device_time_iso".into(), clock.iso.clone());
}

fn tally_variables(vars: &mut VariableSet, tally: &TallyState) {
    vars.insert("tally_color_id".into(), tally.color_id.clone());
    vars.insert("tally_mode_id".into(), tally.mode_id.clone());
}

fn recording_variables(vars: &mut VariableSet, tasks: &[RecordingTask]) {
    for task in tasks {
        let prefix = format!("recording_{}", task.index);
        vars.insert(format!("{prefix}_status"), task.status.to_string());
        vars.insert(
            format!("{prefix}_record_mode"),
            bool_str(task.record_mode).into(),
        );
        vars.insert(
            format!("{prefix}_record_loop_mode"),
            bool_str(task.record_loop_mode).into(),
        );
        vars.insert(
            format!("{prefix}_curr_file_name"),
            task.curr_file_name.clone(),
        );
        vars.insert(
            format!("{prefix}_file_name_prefix"),
            task.file_name_prefix.clone(),
        );
        vars.insert(format!("{prefix}_duration"), task.duration.to_string());
        vars.insert(
            format!("{prefix}_curr_file_size"),
            task.curr_file_size.to_string(),
        );
        vars.insert(format!("{prefix}_limit_type"), task.limit_type.clone());
        vars.insert(format!("{prefix}_size_limit"), task.size_limit.to_string());
        vars.insert(format!("{prefix}_time_limit"), task.time_limit.to_string());

        let storage = &task.storage_info;
        vars.insert(
            format!("{prefix}_storage_mount_path"),
            storage.mount_path.clone(),
        );
        vars.insert(
            format!("{prefix}_storage_totalspace"),
            storage.totalspace.to_string(),
        );
        vars.insert(
            format!("{prefix}_storage_freespace"),
            storage.freespace.to_string(),
        );
        vars.insert(
            format!("{prefix}_storage_usagespace"),
            storage.usagespace.to_string(),
        );
        vars.insert(
            format!("{prefix}_storage_speed_test_status"),
            storage.speed_test_status.to_string(),
        );
        vars.insert(
            format!("{prefix}_storage_write_speed"),
            storage.write_speed.to_string(),
        );
        vars.insert(
            format!("{prefix}_storage_read_speed"),
            storage.read_speed.to_string(),
        );
    }
}

fn ndi_variables(vars: &mut VariableSet, sources: &[NdiSource]) {
    for source in sources {
        let prefix = format!("ndi_{}", source.index);
        vars.insert(format!("{prefix}_name"), source.name.clone());
        vars.insert(
            format!("{prefix}_status"),
            source.streamplay_status.to_string(),
        );
        vars.insert(format!("{prefix}_bandwidth"), source.bandwidth.to_string());
        vars.insert(format!("{prefix}_framerate"), source.framerate.to_string());
        vars.insert(
            format!("{prefix}_resolution"),
            format!("{}x{}", source.width, source.height),
        );
    }
}

/// Build the variable set for everything currently populated in the
/// cache. Unpopulated domains contribute nothing (their identifiers
/// appear once the first acceptable poll lands).
pub(crate) fn collect(cache: &StateCache) -> VariableSet {
    let mut vars = VariableSet::new();
    if let Some(input) = cache.input_signal.get() {
        input_variables(&mut vars, &input);
    }
    if let Some(output) = cache.output_info.get() {
        output_variables(&mut vars, &output);
    }
    if let Some(audio) = cache.audio.get() {
        audio_variables(&mut vars, &audio);
    }
    if let Some(clock) = cache.clock.get() {
        clock_variables(&mut vars, &clock);
    }
    if let Some(tally) = cache.tally.get() {
        tally_variables(&mut vars, &tally);
    }
    if let Some(tasks) = cache.recording_tasks.get() {
        recording_variables(&mut vars, &tasks);
    }
    if let Some(sources) = cache.ndi_sources.get() {
        ndi_variables(&mut vars, &sources);
    }
    vars
}

/// Merge a freshly collected set over the previously published one.
/// Identifiers absent from the fresh set keep their old values.
pub(crate) fn merged(previous: &VariableSet, cache: &StateCache) -> VariableSet {
    let mut vars = previous.clone();
    vars.extend(collect(cache));
    vars
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cache_with_tasks(tasks: Vec<RecordingTask>) -> StateCache {
        let cache = StateCache::new();
        cache.recording_tasks.store(tasks);
        cache
    }

    fn task(index: &str, status: i64) -> RecordingTask {
        RecordingTask {
            index: index.into(),
            status,
            ..RecordingTask::default()
        }
    }

    #[test]
    fn empty_cache_publishes_nothing() {
        assert!(collect(&StateCache::new()).is_empty());
    }

    #[test]
    fn identifiers_are_namespaced_by_task_index() {
        let vars = collect(&cache_with_tasks(vec![task("usb1_0", 1), task("sdcard_0", 0)]));
        assert_eq!(vars.get("recording_usb1_0_status").unwrap(), "1");
        assert_eq!(vars.get("recording_sdcard_0_status").unwrap(), "0");
    }

    #[test]
    fn missing_subfields_coerce_to_defaults_never_undefined() {
        let vars = collect(&cache_with_tasks(vec![task("usb1_0", 5)]));
        // A task with no storage details still publishes defined values.
        assert_eq!(vars.get("recording_usb1_0_storage_freespace").unwrap(), "0");
        assert_eq!(vars.get("recording_usb1_0_curr_file_name").unwrap(), "");
        assert!(vars.values().all(|v| v != "undefined"));
    }

    #[test]
    fn flags_booleanize() {
        let cache = StateCache::new();
        cache.output_info.store(zowiebox_api::video::OutputInfo {
            switch: None,
            format: "1080p60".into(),
            audio_switch: 1,
            loop_out_switch: 0,
        });
        let vars = collect(&cache);
        assert_eq!(vars.get("output_audio_switch").unwrap(), "true");
        assert_eq!(vars.get("output_loop_out_switch").unwrap(), "false");
        assert_eq!(vars.get("output_format").unwrap(), "1080p60");
    }

    #[test]
    fn shrunken_array_domain_keeps_stale_identifiers() {
        let cache = cache_with_tasks(vec![task("usb1_0", 1), task("nas1_0", 0)]);
        let first = merged(&VariableSet::new(), &cache);
        assert!(first.contains_key("recording_nas1_0_status"));

        // NAS disappears between polls.
        cache.recording_tasks.store(vec![task("usb1_0", 2)]);
        let second = merged(&first, &cache);

        assert_eq!(second.get("recording_usb1_0_status").unwrap(), "2");
        // Stale identifier persists with its last-known value.
        assert_eq!(second.get("recording_nas1_0_status").unwrap(), "0");
    }
}
