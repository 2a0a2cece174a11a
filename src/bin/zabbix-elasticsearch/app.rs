use tracing::{debug, info};
use zabbix_elasticsearch::Result;
use zabbix_elasticsearch::config::Config;
use zabbix_elasticsearch::es_client::{ApiRequest, EsClient};
use zabbix_elasticsearch::metrics::{Metric, MetricValue};
use zabbix_elasticsearch::telemetry::init_tracing;
use zabbix_elasticsearch::types::validate_args;

use super::cli::Cli;

pub async fn run(cli: Cli) -> Result<MetricValue> {
    let (config_path, required) = cli.config_path();
    let config = Config::load(&config_path, required, &cli.overrides())?;

    init_tracing(&config.log, cli.log_filter.as_deref(), cli.json_logs)?;
    debug!(config = %config_path.display(), "configuration loaded");

    let (api, endpoint) = validate_args(cli.api, cli.endpoint)?;
    let metric = Metric::from_arg(cli.metric.as_deref())?;
    let request = ApiRequest::build(
        api,
        endpoint,
        cli.parameters.as_deref(),
        cli.nodes.as_deref(),
    )?;

    let client = EsClient::new(config.elasticsearch)?;
    debug!(
        %api,
        %endpoint,
        path = %request.path(),
        hosts = client.hosts().len(),
        "calling elasticsearch"
    );
    let response = client.get(&request).await?;

    if metric.is_discovery() {
        info!(%metric, "running discovery");
    }
    let value = metric.extract(endpoint, &response, cli.nodes.as_deref())?;
    info!(%metric, %value, "metric collected");
    Ok(value)
}
