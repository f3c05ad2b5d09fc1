//! Rule table of the BGP global resource.
//!
//! Fields that may appear both directly under `router bgp` and inside a
//! `vrf` block are shaped under `vrfs."vrf_<name>"`; the router-level ones
//! land under the `vrf_` key and are lifted back to the root when facts are
//! built.

use crate::modules::network::common::nest;
use crate::modules::network::template::{NetworkTemplate, ParserRule, Setval};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

const VRF_KEY: &str = "{{ 'vrf_' ~ vrf|default('') }}";

/// Key under `vrfs` that holds router-level fields in parser output.
pub(crate) const GLOBAL_VRF_KEY: &str = "vrf_";

const INT: &str = "{{ value|int }}";
const STR: &str = "{{ value }}";

pub(crate) const ROUTER: &[&str] = &["router"];
pub(crate) const VRF: &[&str] = &["vrf"];
pub(crate) const ROUTER_OR_VRF: &[&str] = &["router", "vrf"];
pub(crate) const NEIGHBOR: &[&str] = &["neighbor"];
pub(crate) const RPKI_SERVER: &[&str] = &["rpki_server"];

/// Nest `leaf` at a dotted path.
fn at(path: &str, leaf: Value) -> Value {
    path.rsplit('.').fold(leaf, |acc, segment| nest(segment, acc))
}

fn in_vrf(body: Value) -> Value {
    nest("vrfs", nest(VRF_KEY, body))
}

fn in_neighbor(body: Value) -> Value {
    in_vrf(nest("neighbors", nest("{{ neighbor }}", body)))
}

fn in_rpki_server(body: Value) -> Value {
    nest("rpki", nest("servers", nest("{{ server }}", body)))
}

/// A router or VRF level line whose value (or presence) lands at `compval`.
fn global(
    name: &'static str,
    getval: &str,
    setval: &'static str,
    compval: &'static str,
    leaf: Value,
    scope: &'static [&'static str],
) -> ParserRule {
    ParserRule::new(name, getval, Setval::Template(setval))
        .compval(compval)
        .result(in_vrf(at(compval, leaf)))
        .scope(scope)
}

/// A line inside a `neighbor` block.
fn neighbor(
    name: &'static str,
    getval: &str,
    setval: &'static str,
    compval: &'static str,
    leaf: Value,
) -> ParserRule {
    ParserRule::new(name, getval, Setval::Template(setval))
        .compval(compval)
        .result(in_neighbor(at(compval, leaf)))
        .scope(NEIGHBOR)
}

/// A line inside an `rpki server` block.
fn rpki(
    name: &'static str,
    getval: &str,
    setval: &'static str,
    compval: &'static str,
    leaf: Value,
) -> ParserRule {
    ParserRule::new(name, getval, Setval::Template(setval))
        .compval(compval)
        .result(in_rpki_server(at(compval, leaf)))
        .scope(RPKI_SERVER)
}

pub(crate) static TEMPLATE: Lazy<NetworkTemplate> = Lazy::new(|| {
    let on = || json!(true);
    let int = || json!(INT);
    let string = || json!(STR);

    NetworkTemplate::new(vec![
        // Contexts
        ParserRule::new(
            "router",
            r"^router\sbgp\s(?P<as_number>\S+)$",
            Setval::Template("router bgp {{ as_number }}"),
        )
        .result(json!({"as_number": "{{ as_number }}"}))
        .shared(),
        ParserRule::new(
            "vrf",
            r"^\s+vrf\s(?P<vrf>\S+)$",
            Setval::Template("vrf {{ vrf }}"),
        )
        .result(in_vrf(json!({"vrf": "{{ vrf }}"})))
        .shared()
        .scope(ROUTER),
        ParserRule::new(
            "neighbor",
            r"^\s+neighbor\s(?P<neighbor>\S+)$",
            Setval::Template("neighbor {{ neighbor }}"),
        )
        .result(in_neighbor(json!({"neighbor": "{{ neighbor }}"})))
        .shared()
        .scope(ROUTER_OR_VRF),
        ParserRule::new(
            "rpki_server",
            r"^\s+rpki\sserver\s(?P<server>\S+)$",
            Setval::Template("rpki server {{ name }}"),
        )
        .result(in_rpki_server(json!({"name": "{{ server }}"})))
        .shared()
        .scope(ROUTER),
        // Router and VRF level
        global(
            "bfd_minimum_interval",
            r"^\s+bfd\sminimum-interval\s(?P<value>\d+)$",
            "bfd minimum-interval {{ bfd.minimum_interval }}",
            "bfd.minimum_interval",
            int(),
            ROUTER_OR_VRF,
        ),
        global(
            "bfd_multiplier",
            r"^\s+bfd\smultiplier\s(?P<value>\d+)$",
            "bfd multiplier {{ bfd.multiplier }}",
            "bfd.multiplier",
            int(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_auto_policy_soft_reset",
            r"^\s+bgp\sauto-policy-soft-reset\sdisable$",
            "bgp auto-policy-soft-reset disable",
            "bgp.auto_policy_soft_reset.disable",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_aigp",
            r"^\s+bgp\sbestpath\saigp\signore$",
            "bgp bestpath aigp ignore",
            "bgp.bestpath.aigp.ignore",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_as_path_ignore",
            r"^\s+bgp\sbestpath\sas-path\signore$",
            "bgp bestpath as-path ignore",
            "bgp.bestpath.as_path.ignore",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_as_path_multipath_relax",
            r"^\s+bgp\sbestpath\sas-path\smultipath-relax$",
            "bgp bestpath as-path multipath-relax",
            "bgp.bestpath.as_path.multipath_relax",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_compare_routerid",
            r"^\s+bgp\sbestpath\scompare-routerid$",
            "bgp bestpath compare-routerid",
            "bgp.bestpath.compare_routerid",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_cost_community",
            r"^\s+bgp\sbestpath\scost-community\signore$",
            "bgp bestpath cost-community ignore",
            "bgp.bestpath.cost_community.ignore",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_med_always",
            r"^\s+bgp\sbestpath\smed\salways$",
            "bgp bestpath med always",
            "bgp.bestpath.med.always",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_med_confed",
            r"^\s+bgp\sbestpath\smed\sconfed$",
            "bgp bestpath med confed",
            "bgp.bestpath.med.confed",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_med_missing_as_worst",
            r"^\s+bgp\sbestpath\smed\smissing-as-worst$",
            "bgp bestpath med missing-as-worst",
            "bgp.bestpath.med.missing_as_worst",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_origin_as_use",
            r"^\s+bgp\sbestpath\sorigin-as\suse\svalidity$",
            "bgp bestpath origin-as use validity",
            "bgp.bestpath.origin_as.use.validity",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_bestpath_origin_as_allow",
            r"^\s+bgp\sbestpath\sorigin-as\sallow\sinvalid$",
            "bgp bestpath origin-as allow invalid",
            "bgp.bestpath.origin_as.allow.invalid",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_cluster_id",
            r"^\s+bgp\scluster-id\s(?P<value>\S+)$",
            "bgp cluster-id {{ bgp.cluster_id }}",
            "bgp.cluster_id",
            string(),
            ROUTER,
        ),
        global(
            "bgp_confederation_identifier",
            r"^\s+bgp\sconfederation\sidentifier\s(?P<value>\S+)$",
            "bgp confederation identifier {{ bgp.confederation.identifier }}",
            "bgp.confederation.identifier",
            string(),
            ROUTER,
        ),
        global(
            "bgp_default_local_preference",
            r"^\s+bgp\sdefault\slocal-preference\s(?P<value>\d+)$",
            "bgp default local-preference {{ bgp.default.local_preference }}",
            "bgp.default.local_preference",
            int(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_enforce_first_as",
            r"^\s+bgp\senforce-first-as\sdisable$",
            "bgp enforce-first-as disable",
            "bgp.enforce_first_as.disable",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_fast_external_fallover",
            r"^\s+bgp\sfast-external-fallover\sdisable$",
            "bgp fast-external-fallover disable",
            "bgp.fast_external_fallover.disable",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_graceful_restart",
            r"^\s+bgp\sgraceful-restart$",
            "bgp graceful-restart",
            "bgp.graceful_restart.set",
            on(),
            ROUTER,
        ),
        global(
            "bgp_graceful_restart_graceful_reset",
            r"^\s+bgp\sgraceful-restart\sgraceful-reset$",
            "bgp graceful-restart graceful-reset",
            "bgp.graceful_restart.graceful_reset",
            on(),
            ROUTER,
        ),
        global(
            "bgp_graceful_restart_restart_time",
            r"^\s+bgp\sgraceful-restart\srestart-time\s(?P<value>\d+)$",
            "bgp graceful-restart restart-time {{ bgp.graceful_restart.restart_time }}",
            "bgp.graceful_restart.restart_time",
            int(),
            ROUTER,
        ),
        global(
            "bgp_graceful_restart_stalepath_time",
            r"^\s+bgp\sgraceful-restart\sstalepath-time\s(?P<value>\d+)$",
            "bgp graceful-restart stalepath-time {{ bgp.graceful_restart.stalepath_time }}",
            "bgp.graceful_restart.stalepath_time",
            int(),
            ROUTER,
        ),
        global(
            "bgp_graceful_restart_purge_time",
            r"^\s+bgp\sgraceful-restart\spurge-time\s(?P<value>\d+)$",
            "bgp graceful-restart purge-time {{ bgp.graceful_restart.purge_time }}",
            "bgp.graceful_restart.purge_time",
            int(),
            ROUTER,
        ),
        global(
            "bgp_install_diversion",
            r"^\s+bgp\sinstall\sdiversion$",
            "bgp install diversion",
            "bgp.install.diversion",
            on(),
            ROUTER,
        ),
        global(
            "bgp_log_message",
            r"^\s+bgp\slog\smessage\sdisable$",
            "bgp log message disable",
            "bgp.log.log_message.disable",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_log_neighbor_changes_detail",
            r"^\s+bgp\slog\sneighbor\schanges\sdetail$",
            "bgp log neighbor changes detail",
            "bgp.log.neighbor.changes.detail",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_log_neighbor_changes_disable",
            r"^\s+bgp\slog\sneighbor\schanges\sdisable$",
            "bgp log neighbor changes disable",
            "bgp.log.neighbor.changes.disable",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_maximum_neighbor",
            r"^\s+bgp\smaximum\sneighbor\s(?P<value>\d+)$",
            "bgp maximum neighbor {{ bgp.maximum.neighbor }}",
            "bgp.maximum.neighbor",
            int(),
            ROUTER,
        ),
        global(
            "bgp_multipath_as_path_ignore_onwards",
            r"^\s+bgp\smultipath\sas-path\signore\sonwards$",
            "bgp multipath as-path ignore onwards",
            "bgp.multipath.as_path.ignore.onwards",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_origin_as_validation_disable",
            r"^\s+bgp\sorigin-as\svalidation\sdisable$",
            "bgp origin-as validation disable",
            "bgp.origin_as.validation.disable",
            on(),
            ROUTER,
        ),
        global(
            "bgp_origin_as_validation_signal_ibgp",
            r"^\s+bgp\sorigin-as\svalidation\ssignal\sibgp$",
            "bgp origin-as validation signal ibgp",
            "bgp.origin_as.validation.signal.ibgp",
            on(),
            ROUTER,
        ),
        global(
            "bgp_origin_as_validation_time_off",
            r"^\s+bgp\sorigin-as\svalidation\stime\soff$",
            "bgp origin-as validation time off",
            "bgp.origin_as.validation.time.time_off",
            on(),
            ROUTER,
        ),
        global(
            "bgp_origin_as_validation_time",
            r"^\s+bgp\sorigin-as\svalidation\stime\s(?P<value>\d+)$",
            "bgp origin-as validation time {{ bgp.origin_as.validation.time.time_in_second }}",
            "bgp.origin_as.validation.time.time_in_second",
            int(),
            ROUTER,
        ),
        global(
            "bgp_redistribute_internal",
            r"^\s+bgp\sredistribute-internal$",
            "bgp redistribute-internal",
            "bgp.redistribute_internal",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_router_id",
            r"^\s+bgp\srouter-id\s(?P<value>\S+)$",
            "bgp router-id {{ bgp.router_id }}",
            "bgp.router_id",
            string(),
            ROUTER_OR_VRF,
        ),
        global(
            "bgp_scan_time",
            r"^\s+bgp\sscan-time\s(?P<value>\d+)$",
            "bgp scan-time {{ bgp.scan_time }}",
            "bgp.scan_time",
            int(),
            ROUTER,
        ),
        global(
            "bgp_unsafe_ebgp_policy",
            r"^\s+bgp\sunsafe-ebgp-policy$",
            "bgp unsafe-ebgp-policy",
            "bgp.unsafe_ebgp_policy",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "default_information_originate",
            r"^\s+default-information\soriginate$",
            "default-information originate",
            "default_information.originate",
            on(),
            ROUTER_OR_VRF,
        ),
        global(
            "default_metric",
            r"^\s+default-metric\s(?P<value>\d+)$",
            "default-metric {{ default_metric }}",
            "default_metric",
            int(),
            ROUTER_OR_VRF,
        ),
        global(
            "ibgp_policy_out_enforce_modifications",
            r"^\s+ibgp\spolicy\sout\senforce-modifications$",
            "ibgp policy out enforce-modifications",
            "ibgp.policy.out.enforce_modifications",
            on(),
            ROUTER,
        ),
        global("mvpn", r"^\s+mvpn$", "mvpn", "mvpn", on(), ROUTER_OR_VRF),
        global("nsr", r"^\s+nsr$", "nsr", "nsr.set", on(), ROUTER),
        global(
            "nsr_disable",
            r"^\s+nsr\sdisable$",
            "nsr disable",
            "nsr.disable",
            on(),
            ROUTER,
        ),
        global(
            "socket_receive_buffer_size",
            r"^\s+socket\sreceive-buffer-size\s(?P<value>\d+)$",
            "socket receive-buffer-size {{ socket.receive_buffer_size }}",
            "socket.receive_buffer_size",
            int(),
            ROUTER_OR_VRF,
        ),
        global(
            "socket_send_buffer_size",
            r"^\s+socket\ssend-buffer-size\s(?P<value>\d+)$",
            "socket send-buffer-size {{ socket.send_buffer_size }}",
            "socket.send_buffer_size",
            int(),
            ROUTER_OR_VRF,
        ),
        ParserRule::new(
            "timers",
            r"^\s+timers\sbgp\s(?P<keepalive>\d+)\s(?P<holdtime>\d+)$",
            Setval::Template("timers bgp {{ timers.keepalive_time }} {{ timers.holdtime }}"),
        )
        .result(in_vrf(json!({
            "timers": {"keepalive_time": "{{ keepalive|int }}", "holdtime": "{{ holdtime|int }}"}
        })))
        .scope(ROUTER_OR_VRF),
        global(
            "update_in_error_handling_basic_ebgp",
            r"^\s+update\sin\serror-handling\sbasic\sebgp\sdisable$",
            "update in error-handling basic ebgp disable",
            "update.in.error_handling.basic.ebgp.disable",
            on(),
            ROUTER,
        ),
        global(
            "update_in_error_handling_basic_ibgp",
            r"^\s+update\sin\serror-handling\sbasic\sibgp\sdisable$",
            "update in error-handling basic ibgp disable",
            "update.in.error_handling.basic.ibgp.disable",
            on(),
            ROUTER,
        ),
        global(
            "update_in_error_handling_extended_ebgp",
            r"^\s+update\sin\serror-handling\sextended\sebgp$",
            "update in error-handling extended ebgp",
            "update.in.error_handling.extended.ebgp",
            on(),
            ROUTER,
        ),
        global(
            "update_in_error_handling_extended_ibgp",
            r"^\s+update\sin\serror-handling\sextended\sibgp$",
            "update in error-handling extended ibgp",
            "update.in.error_handling.extended.ibgp",
            on(),
            ROUTER,
        ),
        global(
            "update_limit",
            r"^\s+update\slimit\s(?P<value>\d+)$",
            "update limit {{ update.limit }}",
            "update.limit",
            int(),
            ROUTER,
        ),
        global(
            "update_out_logging",
            r"^\s+update\sout\slogging$",
            "update out logging",
            "update.out.logging",
            on(),
            ROUTER,
        ),
        global("rd_auto", r"^\s+rd\sauto$", "rd auto", "rd.auto", on(), VRF),
        // Neighbor level
        neighbor(
            "neighbor_advertisement_interval",
            r"^\s+advertisement-interval\s(?P<value>\d+)$",
            "advertisement-interval {{ advertisement_interval }}",
            "advertisement_interval",
            int(),
        ),
        neighbor(
            "neighbor_bfd_fast_detect",
            r"^\s+bfd\sfast-detect$",
            "bfd fast-detect",
            "bfd.fast_detect.set",
            on(),
        ),
        neighbor(
            "neighbor_bfd_fast_detect_strict_mode",
            r"^\s+bfd\sfast-detect\sstrict-mode$",
            "bfd fast-detect strict-mode",
            "bfd.fast_detect.strict_mode",
            on(),
        ),
        neighbor(
            "neighbor_bfd_fast_detect_disable",
            r"^\s+bfd\sfast-detect\sdisable$",
            "bfd fast-detect disable",
            "bfd.fast_detect.disable",
            on(),
        ),
        neighbor(
            "neighbor_bfd_minimum_interval",
            r"^\s+bfd\sminimum-interval\s(?P<value>\d+)$",
            "bfd minimum-interval {{ bfd.minimum_interval }}",
            "bfd.minimum_interval",
            int(),
        ),
        neighbor(
            "neighbor_bfd_multiplier",
            r"^\s+bfd\smultiplier\s(?P<value>\d+)$",
            "bfd multiplier {{ bfd.multiplier }}",
            "bfd.multiplier",
            int(),
        ),
        neighbor(
            "neighbor_bmp_activate",
            r"^\s+bmp-activate\sserver\s(?P<value>\d+)$",
            "bmp-activate server {{ bmp_activate.server }}",
            "bmp_activate.server",
            int(),
        ),
        neighbor(
            "neighbor_capability_suppress_four_byte_as",
            r"^\s+capability\ssuppress\s4-byte-as$",
            "capability suppress 4-byte-as",
            "capability.suppress.four_byte_as.set",
            on(),
        ),
        neighbor(
            "neighbor_capability_suppress_all",
            r"^\s+capability\ssuppress\sall$",
            "capability suppress all",
            "capability.suppress.all.set",
            on(),
        ),
        neighbor(
            "neighbor_cluster_id",
            r"^\s+cluster-id\s(?P<value>\S+)$",
            "cluster-id {{ cluster_id }}",
            "cluster_id",
            string(),
        ),
        neighbor(
            "neighbor_description",
            r"^\s+description\s(?P<value>.+)$",
            "description {{ description }}",
            "description",
            string(),
        ),
        neighbor(
            "neighbor_dmz_link_bandwidth",
            r"^\s+dmz-link-bandwidth$",
            "dmz-link-bandwidth",
            "dmz_link_bandwidth.set",
            on(),
        ),
        neighbor(
            "neighbor_dmz_link_bandwidth_inheritance_disable",
            r"^\s+dmz-link-bandwidth\sinheritance-disable$",
            "dmz-link-bandwidth inheritance-disable",
            "dmz_link_bandwidth.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_dscp",
            r"^\s+dscp\s(?P<value>\S+)$",
            "dscp {{ dscp }}",
            "dscp",
            string(),
        ),
        ParserRule::new(
            "neighbor_ebgp_multihop",
            r"^\s+ebgp-multihop\s(?P<value>\d+)(?P<mpls>\smpls)?$",
            Setval::Template(
                "ebgp-multihop {{ ebgp_multihop.value }}{{ ' mpls' if ebgp_multihop.mpls|default(false) else '' }}",
            ),
        )
        .compval("ebgp_multihop")
        .result(in_neighbor(json!({
            "ebgp_multihop": {"value": INT, "mpls": "{{ true if mpls is defined }}"}
        })))
        .scope(NEIGHBOR),
        neighbor(
            "neighbor_egress_engineering",
            r"^\s+egress-engineering$",
            "egress-engineering",
            "egress_engineering.set",
            on(),
        ),
        neighbor(
            "neighbor_egress_engineering_inheritance_disable",
            r"^\s+egress-engineering\sinheritance-disable$",
            "egress-engineering inheritance-disable",
            "egress_engineering.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_enforce_first_as",
            r"^\s+enforce-first-as\sdisable$",
            "enforce-first-as disable",
            "enforce_first_as.disable",
            on(),
        ),
        neighbor(
            "neighbor_graceful_restart_restart_time",
            r"^\s+graceful-restart\srestart-time\s(?P<value>\d+)$",
            "graceful-restart restart-time {{ graceful_restart.restart_time }}",
            "graceful_restart.restart_time",
            int(),
        ),
        neighbor(
            "neighbor_graceful_restart_stalepath_time",
            r"^\s+graceful-restart\sstalepath-time\s(?P<value>\d+)$",
            "graceful-restart stalepath-time {{ graceful_restart.stalepath_time }}",
            "graceful_restart.stalepath_time",
            int(),
        ),
        neighbor(
            "neighbor_ignore_connected_check",
            r"^\s+ignore-connected-check$",
            "ignore-connected-check",
            "ignore_connected_check.set",
            on(),
        ),
        neighbor(
            "neighbor_ignore_connected_check_inheritance_disable",
            r"^\s+ignore-connected-check\sinheritance-disable$",
            "ignore-connected-check inheritance-disable",
            "ignore_connected_check.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_keychain_inheritance_disable",
            r"^\s+keychain\sinheritance-disable$",
            "keychain inheritance-disable",
            "keychain.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_keychain",
            r"^\s+keychain\s(?P<value>\S+)$",
            "keychain {{ keychain.name }}",
            "keychain.name",
            string(),
        ),
        neighbor(
            "neighbor_local_as",
            r"^\s+local-as\s(?P<value>\d+(?:\.\d+)?)$",
            "local-as {{ local_as.value }}",
            "local_as.value",
            string(),
        ),
        neighbor(
            "neighbor_local_as_inheritance_disable",
            r"^\s+local-as\sinheritance-disable$",
            "local-as inheritance-disable",
            "local_as.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_origin_as",
            r"^\s+origin-as\svalidation\sdisable$",
            "origin-as validation disable",
            "origin_as.validation.disable",
            on(),
        ),
        neighbor(
            "neighbor_password",
            r"^\s+password\sencrypted\s(?P<value>\S+)$",
            "password encrypted {{ password.encrypted }}",
            "password.encrypted",
            string(),
        ),
        neighbor(
            "neighbor_password_inheritance_disable",
            r"^\s+password\sinheritance-disable$",
            "password inheritance-disable",
            "password.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_receive_buffer_size",
            r"^\s+receive-buffer-size\s(?P<value>\d+)$",
            "receive-buffer-size {{ receive_buffer_size }}",
            "receive_buffer_size",
            int(),
        ),
        neighbor(
            "neighbor_remote_as",
            r"^\s+remote-as\s(?P<value>\d+(?:\.\d+)?)$",
            "remote-as {{ remote_as }}",
            "remote_as",
            string(),
        ),
        neighbor(
            "neighbor_send_buffer_size",
            r"^\s+send-buffer-size\s(?P<value>\d+)$",
            "send-buffer-size {{ send_buffer_size }}",
            "send_buffer_size",
            int(),
        ),
        neighbor(
            "neighbor_session_open_mode",
            r"^\s+session-open-mode\s(?P<value>active-only|both|passive-only)$",
            "session-open-mode {{ session_open_mode }}",
            "session_open_mode",
            string(),
        ),
        neighbor(
            "neighbor_shutdown",
            r"^\s+shutdown$",
            "shutdown",
            "shutdown.set",
            on(),
        ),
        neighbor(
            "neighbor_shutdown_inheritance_disable",
            r"^\s+shutdown\sinheritance-disable$",
            "shutdown inheritance-disable",
            "shutdown.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_tcp_mss",
            r"^\s+tcp\smss\s(?P<value>\d+)$",
            "tcp mss {{ tcp.mss.value }}",
            "tcp.mss.value",
            int(),
        ),
        neighbor(
            "neighbor_tcp_mss_inheritance_disable",
            r"^\s+tcp\smss\sinheritance-disable$",
            "tcp mss inheritance-disable",
            "tcp.mss.inheritance_disable",
            on(),
        ),
        ParserRule::new(
            "neighbor_timers",
            r"^\s+timers\s(?P<keepalive>\d+)\s(?P<holdtime>\d+)$",
            Setval::Template("timers {{ timers.keepalive_time }} {{ timers.holdtime }}"),
        )
        .compval("timers")
        .result(in_neighbor(json!({
            "timers": {"keepalive_time": "{{ keepalive|int }}", "holdtime": "{{ holdtime|int }}"}
        })))
        .scope(NEIGHBOR),
        neighbor(
            "neighbor_ttl_security",
            r"^\s+ttl-security$",
            "ttl-security",
            "ttl_security.set",
            on(),
        ),
        neighbor(
            "neighbor_ttl_security_inheritance_disable",
            r"^\s+ttl-security\sinheritance-disable$",
            "ttl-security inheritance-disable",
            "ttl_security.inheritance_disable",
            on(),
        ),
        neighbor(
            "neighbor_update_source",
            r"^\s+update-source\s(?P<value>\S+)$",
            "update-source {{ update_source }}",
            "update_source",
            string(),
        ),
        neighbor(
            "neighbor_use_neighbor_group",
            r"^\s+use\sneighbor-group\s(?P<value>\S+)$",
            "use neighbor-group {{ use.neighbor_group }}",
            "use.neighbor_group",
            string(),
        ),
        neighbor(
            "neighbor_use_session_group",
            r"^\s+use\ssession-group\s(?P<value>\S+)$",
            "use session-group {{ use.session_group }}",
            "use.session_group",
            string(),
        ),
        // RPKI server level
        rpki(
            "rpki_password",
            r"^\s+password\s(?P<value>\S+)$",
            "password {{ password }}",
            "password",
            string(),
        ),
        rpki(
            "rpki_purge_time",
            r"^\s+purge-time\s(?P<value>\d+)$",
            "purge-time {{ purge_time }}",
            "purge_time",
            int(),
        ),
        rpki(
            "rpki_refresh_time_off",
            r"^\s+refresh-time\soff$",
            "refresh-time off",
            "refresh_time.time_off",
            on(),
        ),
        rpki(
            "rpki_refresh_time",
            r"^\s+refresh-time\s(?P<value>\d+)$",
            "refresh-time {{ refresh_time.value }}",
            "refresh_time.value",
            int(),
        ),
        rpki(
            "rpki_response_time_off",
            r"^\s+response-time\soff$",
            "response-time off",
            "response_time.time_off",
            on(),
        ),
        rpki(
            "rpki_response_time",
            r"^\s+response-time\s(?P<value>\d+)$",
            "response-time {{ response_time.value }}",
            "response_time.value",
            int(),
        ),
        rpki("rpki_shutdown", r"^\s+shutdown$", "shutdown", "shutdown", on()),
        rpki(
            "rpki_transport_ssh",
            r"^\s+transport\sssh\sport\s(?P<value>\d+)$",
            "transport ssh port {{ transport.ssh.port }}",
            "transport.ssh.port",
            int(),
        ),
        rpki(
            "rpki_transport_tcp",
            r"^\s+transport\stcp\sport\s(?P<value>\d+)$",
            "transport tcp port {{ transport.tcp.port }}",
            "transport.tcp.port",
            int(),
        ),
        rpki(
            "rpki_username",
            r"^\s+username\s(?P<value>\S+)$",
            "username {{ username }}",
            "username",
            string(),
        ),
    ])
});

/// Names of the non-context rules that apply inside `scope`, in table order.
pub(crate) fn parsers_in(scope: &str) -> Vec<&'static str> {
    TEMPLATE
        .parsers()
        .iter()
        .filter(|rule| !rule.shared && rule.scope.contains(&scope))
        .map(|rule| rule.name)
        .collect()
}

pub(crate) static ROUTER_PARSERS: Lazy<Vec<&'static str>> = Lazy::new(|| parsers_in("router"));
pub(crate) static VRF_PARSERS: Lazy<Vec<&'static str>> = Lazy::new(|| parsers_in("vrf"));
pub(crate) static NEIGHBOR_PARSERS: Lazy<Vec<&'static str>> = Lazy::new(|| parsers_in("neighbor"));
pub(crate) static RPKI_SERVER_PARSERS: Lazy<Vec<&'static str>> =
    Lazy::new(|| parsers_in("rpki_server"));
