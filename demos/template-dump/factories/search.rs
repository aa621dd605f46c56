fn get_search(api: SerpApiWrapper) -> Tool {
    Tool::new(
        "Search",
        api.run,
        "A search engine. Useful for when you need to answer questions about current events.",
    )
}
