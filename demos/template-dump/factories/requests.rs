fn get_requests_tool() -> EchoTool {
    EchoTool::named("requests_get")
}
